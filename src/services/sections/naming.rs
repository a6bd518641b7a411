/// 班级名称可用的字母数量（A..=Z）
pub const SECTION_NAME_COUNT: usize = 26;

/// 下一个班级名称
///
/// 取去除空白后的最后一个字符：`A` → `B`，`Z` 回绕到 `A`；
/// 空字符串或末尾不是大写字母时返回 `A`。
pub fn next_section_name(last: &str) -> String {
    match last.trim().chars().last() {
        Some('Z') => "A".to_string(),
        Some(c) if c.is_ascii_uppercase() => char::from(c as u8 + 1).to_string(),
        _ => "A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_section_name() {
        assert_eq!(next_section_name("A"), "B");
        assert_eq!(next_section_name("Y"), "Z");
        assert_eq!(next_section_name("Z"), "A");
    }

    #[test]
    fn test_next_section_name_uses_trailing_letter() {
        assert_eq!(next_section_name("IT 1C"), "D");
        assert_eq!(next_section_name("  B  "), "C");
    }

    #[test]
    fn test_next_section_name_defaults_to_a() {
        assert_eq!(next_section_name(""), "A");
        assert_eq!(next_section_name("   "), "A");
        assert_eq!(next_section_name("1"), "A");
        assert_eq!(next_section_name("b"), "A");
    }
}
