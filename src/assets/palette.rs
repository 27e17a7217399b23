//! Shared product color table.
//!
//! This is the one place color names map to hex values; callers build color requests from it
//! instead of keeping their own copies.

/// Product color names and their `#RRGGBB` values.
pub const PALETTE: &[(&str, &str)] = &[
    ("Black", "#000000"),
    ("White", "#FFFFFF"),
    ("Navy", "#1F2A44"),
    ("Royal Blue", "#2B50AA"),
    ("Light Blue", "#A7C7E7"),
    ("Red", "#C8102E"),
    ("Maroon", "#5C1A1B"),
    ("Pink", "#F4A6C0"),
    ("Orange", "#F47B20"),
    ("Gold", "#F2B01E"),
    ("Yellow", "#FFE45C"),
    ("Forest Green", "#2C4A33"),
    ("Kelly Green", "#4CBB17"),
    ("Olive", "#6B6B3A"),
    ("Purple", "#5B2C83"),
    ("Heather Grey", "#B8B8B8"),
    ("Charcoal", "#3B3B3B"),
    ("Sand", "#D8C8A8"),
    ("Brown", "#5A3A22"),
];

/// Look up a palette color by name, ignoring ASCII case and surrounding whitespace.
pub fn lookup_hex(name: &str) -> Option<&'static str> {
    let name = name.trim();
    PALETTE
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, hex)| *hex)
}
