/// Make a user-supplied value safe for a file name: anything outside `[A-Za-z0-9_]` becomes `_`.
pub fn sanitize_file_stem(value: &str) -> String {
    value
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_disallowed_character() {
        assert_eq!(sanitize_file_stem("Salud"), "Salud");
        assert_eq!(sanitize_file_stem("Salud Pública/2"), "Salud_P_blica_2");
        assert_eq!(sanitize_file_stem("a_b-c.d"), "a_b_c_d");
    }
}
