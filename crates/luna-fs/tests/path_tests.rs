use luna_fs::NormalizedPath;
use rstest::rstest;

#[test]
fn test_normalize_forward_slashes() {
    let path = NormalizedPath::new("luna/plugins/qrcode.d.ts");
    assert_eq!(path.as_str(), "luna/plugins/qrcode.d.ts");
}

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("luna\\plugins\\qrcode.d.ts");
    assert_eq!(path.as_str(), "luna/plugins/qrcode.d.ts");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("/proj/.vscode");
    let joined = base.join("typings");
    assert_eq!(joined.as_str(), "/proj/.vscode/typings");
}

#[test]
fn test_join_multi_segment() {
    let base = NormalizedPath::new("/proj/.vscode/typings");
    let joined = base.join("luna\\luna.d.ts");
    assert_eq!(joined.as_str(), "/proj/.vscode/typings/luna/luna.d.ts");
}

#[test]
fn test_parent_and_file_name() {
    let path = NormalizedPath::new("/proj/typings/luna-typings.d.ts");
    assert_eq!(path.file_name(), Some("luna-typings.d.ts"));
    assert_eq!(path.parent().unwrap().as_str(), "/proj/typings");
    assert_eq!(path.extension(), Some("ts"));
}

#[test]
fn test_dotfile_has_no_extension() {
    assert_eq!(NormalizedPath::new("/proj/.luna").extension(), None);
}

#[rstest]
#[case("a/../b", "b")]
#[case("/a/b/../../c", "/c")]
#[case("/..", "/")]
#[case("C:/../a", "C:/a")]
#[case("a\\..\\b", "b")]
#[case("a/./b//c", "a/b/c")]
#[case("", ".")]
#[case("a/..", ".")]
fn test_traversal_is_resolved(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[rstest]
#[case("../a", "../a")]
#[case("../../a/b", "../../a/b")]
#[case("../cfg.toml", "../cfg.toml")]
#[case("..\\LunaTypings", "../LunaTypings")]
#[case("a/../../b", "../b")]
#[case("./../x/../y", "../y")]
#[case("a/../..", "..")]
fn test_leading_parent_segments_are_kept(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[test]
fn test_parent_climbs_past_leading_parent_segments() {
    assert_eq!(NormalizedPath::new("../a").parent(), Some(NormalizedPath::new("..")));
    assert_eq!(
        NormalizedPath::new("..").parent(),
        Some(NormalizedPath::new("../.."))
    );
}

#[test]
fn test_absolute_from_anchors_relative_paths() {
    let cwd = NormalizedPath::new("/work/sibling");
    assert_eq!(
        NormalizedPath::new("../bundle").absolute_from(&cwd),
        NormalizedPath::new("/work/bundle")
    );
    assert_eq!(
        NormalizedPath::new("/elsewhere").absolute_from(&cwd),
        NormalizedPath::new("/elsewhere")
    );
}

#[test]
fn test_relative_to_refuses_base_that_climbs() {
    let base = NormalizedPath::new("../typings");
    assert_eq!(NormalizedPath::new("a/luna.d.ts").relative_to(&base), None);
    assert_eq!(
        NormalizedPath::new("../typings/luna.d.ts").relative_to(&base),
        Some("luna.d.ts".to_string())
    );
}

#[rstest]
#[case("/proj/.vscode/typings/luna/luna.d.ts", "/proj/typings", "../.vscode/typings/luna/luna.d.ts")]
#[case("/proj/typings/luna/luna.d.ts", "/proj/typings", "luna/luna.d.ts")]
#[case("/proj/typings", "/proj/typings", ".")]
#[case("/a/b", "/c/d", "../../a/b")]
#[case("luna/luna.d.ts", ".", "luna/luna.d.ts")]
fn test_relative_to(#[case] path: &str, #[case] base: &str, #[case] expected: &str) {
    let relative = NormalizedPath::new(path)
        .relative_to(&NormalizedPath::new(base))
        .unwrap();
    assert_eq!(relative, expected);
}

#[test]
fn test_relative_to_mismatched_roots() {
    let absolute = NormalizedPath::new("/proj/typings");
    let relative = NormalizedPath::new("proj/typings");
    assert_eq!(absolute.relative_to(&relative), None);
    assert_eq!(relative.relative_to(&absolute), None);
}

#[test]
fn test_network_root_is_kept() {
    let path = NormalizedPath::new("\\\\server\\share\\proj");
    assert_eq!(path.as_str(), "//server/share/proj");
    assert!(path.is_absolute());
}
