//! Browser-environment tests, run with `wasm-pack test --headless`.

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn module_entry_installs_the_panic_hook() {
    assert!(nightshift::main_js().is_ok());
}

#[wasm_bindgen_test]
fn window_and_storage_are_reachable() {
    let window = web_sys::window().expect("no window in test environment");
    let storage = window
        .local_storage()
        .expect("local storage errored")
        .expect("no local storage in test environment");

    storage
        .set_item("nightshift.test", "ok")
        .expect("storage write failed");
    assert_eq!(
        storage.get_item("nightshift.test").unwrap().as_deref(),
        Some("ok")
    );
    storage.remove_item("nightshift.test").unwrap();
}
