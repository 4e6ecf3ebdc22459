use luna_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));

        // Only a UNC root may begin with a double slash
        let remainder = as_str.strip_prefix("//").unwrap_or(as_str);
        prop_assert!(!remainder.contains("//"));

        // Normalizing twice is the same as normalizing once
        let again = NormalizedPath::new(path.to_native());
        prop_assert_eq!(&path, &again);
    }

    #[test]
    fn test_parent_segments_only_lead(s in "[a-z./\\\\]{0,24}") {
        let path = NormalizedPath::new(&s);
        let segments: Vec<&str> = path.as_str().split('/').collect();
        let leading = segments.iter().take_while(|seg| **seg == "..").count();
        prop_assert!(!segments[leading..].contains(&".."));
        if path.is_absolute() {
            prop_assert_eq!(leading, 0);
        }
    }

    #[test]
    fn test_relative_to_round_trips(
        base in proptest::collection::vec("[a-z]{1,6}", 0..4),
        tail in proptest::collection::vec("[a-z]{1,6}", 1..4),
    ) {
        let base_path = NormalizedPath::new(format!("/{}", base.join("/")));
        let full = base_path.join(&tail.join("/"));
        let relative = full.relative_to(&base_path).unwrap();
        prop_assert_eq!(base_path.join(&relative), full);
    }
}
