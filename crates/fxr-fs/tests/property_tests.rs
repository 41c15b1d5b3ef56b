use fxr_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        // No backslashes survive normalization
        prop_assert!(!as_str.contains('\\'));

        // Only a bare root may end with a separator
        if as_str.len() > 1 {
            prop_assert!(!as_str.ends_with('/'));
        }

        // Normalizing twice is the identity
        let again = NormalizedPath::new(as_str);
        prop_assert_eq!(&path, &again);
    }

    #[test]
    fn nested_path_starts_with_its_base(base in "/[a-z]{1,8}(/[a-z]{1,8}){0,3}", seg in "[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
        let base_path = NormalizedPath::new(&base);
        let nested = NormalizedPath::new(format!("{base}/{seg}"));
        let sibling = NormalizedPath::new(format!("{base}{seg}"));

        prop_assert!(nested.starts_with(&base_path));
        prop_assert!(!sibling.starts_with(&base_path));
    }
}
