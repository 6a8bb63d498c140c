//! Short, deterministic component names.

use super::types::ComponentType;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// Abbreviates a type name: vowels stripped, first three remaining characters kept.
///
/// Short names are not an error; `"io"` abbreviates to `""`.
pub fn abbreviation(type_name: &str) -> String {
    type_name
        .chars()
        .filter(|c| !VOWELS.contains(c))
        .take(3)
        .collect()
}

/// Name for the `sequence`-th component of `component_type` in a system.
///
/// # Examples
///
/// ```
/// use mgrid_builder::components::{ComponentType, naming::component_name};
///
/// assert_eq!(component_name(ComponentType::Battery, 2), "btt2");
/// assert_eq!(component_name(ComponentType::Solar, 1), "slr1");
/// ```
pub fn component_name(component_type: ComponentType, sequence: u32) -> String {
    format!("{}{sequence}", abbreviation(component_type.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battery_names_follow_sequence() {
        let names: Vec<String> = (1..=3)
            .map(|n| component_name(ComponentType::Battery, n))
            .collect();
        assert_eq!(names, ["btt1", "btt2", "btt3"]);
    }

    #[test]
    fn every_type_has_expected_prefix() {
        let expected = [
            (ComponentType::Demand, "dmn1"),
            (ComponentType::Solar, "slr1"),
            (ComponentType::Battery, "btt1"),
            (ComponentType::Generator, "gnr1"),
            (ComponentType::Converter, "cnv1"),
            (ComponentType::Controller, "cnt1"),
            (ComponentType::Grid, "grd1"),
        ];
        for (t, name) in expected {
            assert_eq!(component_name(t, 1), name);
        }
    }

    #[test]
    fn sequence_is_not_padded() {
        assert_eq!(component_name(ComponentType::Grid, 12), "grd12");
    }

    #[test]
    fn short_names_do_not_panic() {
        assert_eq!(abbreviation("ev"), "v");
        assert_eq!(abbreviation("aeiou"), "");
        assert_eq!(abbreviation(""), "");
    }
}
