use super::*;

#[test]
fn ids_are_fixed_width_hex() {
    let id = suite_id("/repo/src/math.test.ts");
    assert_eq!(id.len(), ID_LEN);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn same_input_same_id() {
    assert_eq!(
        test_id("/repo/a.test.ts", "math adds"),
        test_id("/repo/a.test.ts", "math adds")
    );
}

#[test]
fn test_id_depends_on_suite() {
    assert_ne!(
        test_id("/repo/a.test.ts", "adds"),
        test_id("/repo/b.test.ts", "adds")
    );
}

#[test]
fn test_id_differs_from_suite_id() {
    assert_ne!(suite_id("Auth"), test_id("Auth", ""));
}
