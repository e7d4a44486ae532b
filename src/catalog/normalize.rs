// ==========================================
// 学位课程规划引擎 - 课程代码规范化
// ==========================================
// 职责: 旧式/缩写代码 -> 规范代码 (全函数, 永不失败)
// 规范形式: "DEPT NNNNN" (单个空格)
// 未知/无法解析的输入原样返回, 是否视为错误由调用方决定
// ==========================================

/// CS 系三位旧编号的特例映射表
///
/// 历史编号与现行编号并非简单补零关系,
/// 特别注意 241 映射到 25100 而非 24100
const CS_LEGACY_MAP: &[(&str, &str)] = &[
    ("180", "18000"),
    ("182", "18200"),
    ("240", "24000"),
    ("241", "25100"),
    ("250", "25000"),
    ("251", "25100"),
    ("252", "25200"),
    ("307", "30700"),
    ("320", "35200"),
];

/// 规范化课程代码
///
/// 支持的输入形态: "CS 180" / "CS180" / "cs 18000" / "CS 49000-DSO"
///
/// # 返回
/// 规范代码; 无法解析时原样返回输入
pub fn normalize_code(raw: &str) -> String {
    let squashed: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    // 拆分: 字母前缀 + 数字 + 剩余后缀 (如 "-DSO")
    let dept_len = squashed.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    let digit_len = squashed[dept_len..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();

    if dept_len == 0 || digit_len == 0 {
        return raw.to_string();
    }

    let dept = &squashed[..dept_len];
    let num = &squashed[dept_len..dept_len + digit_len];
    let suffix = &squashed[dept_len + digit_len..];

    let canonical_num: String = if num.len() == 3 {
        match dept {
            "CS" => CS_LEGACY_MAP
                .iter()
                .find(|(legacy, _)| *legacy == num)
                .map(|(_, current)| current.to_string())
                .unwrap_or_else(|| format!("{}00", num)),
            "MA" | "STAT" => format!("{}00", num),
            _ => num.to_string(),
        }
    } else {
        num.to_string()
    };

    format!("{} {}{}", dept, canonical_num, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cs_legacy_exceptions() {
        // 241 是数据结构课的旧编号, 对应 25100 而非 24100
        assert_eq!(normalize_code("CS 241"), "CS 25100");
        assert_eq!(normalize_code("CS 180"), "CS 18000");
        assert_eq!(normalize_code("CS 182"), "CS 18200");
        assert_eq!(normalize_code("CS 240"), "CS 24000");
        assert_eq!(normalize_code("CS 250"), "CS 25000");
        assert_eq!(normalize_code("CS 251"), "CS 25100");
        assert_eq!(normalize_code("CS 252"), "CS 25200");
        assert_eq!(normalize_code("CS 307"), "CS 30700");
        assert_eq!(normalize_code("CS 320"), "CS 35200");
    }

    #[test]
    fn test_generic_three_digit_padding() {
        assert_eq!(normalize_code("CS 381"), "CS 38100");
        assert_eq!(normalize_code("MA 261"), "MA 26100");
        assert_eq!(normalize_code("STAT 350"), "STAT 35000");
    }

    #[test]
    fn test_spacing_and_case_insensitivity() {
        assert_eq!(normalize_code("cs180"), "CS 18000");
        assert_eq!(normalize_code("  CS  18000 "), "CS 18000");
        assert_eq!(normalize_code("ma16100"), "MA 16100");
    }

    #[test]
    fn test_suffix_preserved() {
        assert_eq!(normalize_code("CS 49000-DSO"), "CS 49000-DSO");
        assert_eq!(normalize_code("cs49000-sws"), "CS 49000-SWS");
    }

    #[test]
    fn test_unparseable_returned_unchanged() {
        assert_eq!(normalize_code("General Ed"), "General Ed");
        assert_eq!(normalize_code(""), "");
        assert_eq!(normalize_code("12345"), "12345");
    }

    #[test]
    fn test_other_departments_left_as_is() {
        // 仅 CS/MA/STAT 有三位旧编号补零规则
        assert_eq!(normalize_code("PHYS 172"), "PHYS 172");
        assert_eq!(normalize_code("PHYS 17200"), "PHYS 17200");
    }

    #[test]
    fn test_idempotent_on_canonical_input() {
        for code in ["CS 18000", "MA 16100", "STAT 41600", "CS 49000-DSO"] {
            assert_eq!(normalize_code(&normalize_code(code)), code);
        }
    }
}
