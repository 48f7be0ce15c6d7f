//! trybuild 编译期测试：标记宏展开后的代码能够通过编译

#[test]
fn trybuild_store_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/ok_declarations.rs");
    t.pass("tests/trybuild/ok_erased_action.rs");
}
