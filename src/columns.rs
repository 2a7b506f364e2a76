/// Base names of the columns appended to every resolved row.
pub const DERIVED_COLUMNS: [&str; 3] = [
    "ips_from_forward_dns",
    "hostnames_from_reverse_dns",
    "roundtrip_ok",
];

/// Builds the output header: the input header followed by the derived
/// columns. A derived name that is already taken gets the smallest free
/// numeric suffix, `roundtrip_ok` becomes `roundtrip_ok_1` and so on.
pub fn output_header(header: &[String]) -> Vec<String> {
    let mut names = header.to_vec();
    for column in DERIVED_COLUMNS.iter() {
        let name = free_name(&names, column);
        names.push(name);
    }
    names
}

fn free_name(taken: &[String], base: &str) -> String {
    if !taken.iter().any(|name| name == base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
