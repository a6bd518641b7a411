use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 可选：特殊字符（增强安全性）
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 3. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 4. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 5. 常见弱密码检查
    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

static STUDENT_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2,4}-[0-9]{3,6}$").expect("Invalid student number regex"));

static PROGRAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9]{1,9}$").expect("Invalid program regex"));

static SCHOOL_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{4})$").expect("Invalid school year regex"));

pub const MAX_YEAR_LEVEL: i32 = 6;

/// 学号格式，例如 "2024-00123"
pub fn validate_student_number(student_number: &str) -> Result<(), &'static str> {
    if !STUDENT_NUMBER_RE.is_match(student_number) {
        return Err("Student number must look like 2024-00123");
    }
    Ok(())
}

/// 专业代码，大写字母开头，例如 "IT"、"BSCS"
pub fn validate_program(program: &str) -> Result<(), &'static str> {
    if !PROGRAM_RE.is_match(program) {
        return Err("Program must be 2-10 uppercase letters or digits");
    }
    Ok(())
}

pub fn validate_year_level(year_level: i32) -> Result<(), &'static str> {
    if !(1..=MAX_YEAR_LEVEL).contains(&year_level) {
        return Err("Year level must be between 1 and 6");
    }
    Ok(())
}

/// 学年，例如 "2025-2026"，后一年必须紧接前一年
pub fn validate_school_year(school_year: &str) -> Result<(), &'static str> {
    let Some(caps) = SCHOOL_YEAR_RE.captures(school_year) else {
        return Err("School year must look like 2025-2026");
    };
    let start: i32 = caps[1].parse().map_err(|_| "School year must look like 2025-2026")?;
    let end: i32 = caps[2].parse().map_err(|_| "School year must look like 2025-2026")?;
    if end != start + 1 {
        return Err("School year must span two consecutive years");
    }
    Ok(())
}

/// 单项成绩必须落在 [min, max] 区间
pub fn validate_grade(value: f64, min: f64, max: f64) -> Result<(), String> {
    if !value.is_finite() || value < min || value > max {
        return Err(format!("Grade {value} is outside {min}..={max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("MyP@ssw0rd").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_uppercase() {
        let result = validate_password("abcd1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_no_lowercase() {
        let result = validate_password("ABCD1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_student_number() {
        assert!(validate_student_number("2024-00123").is_ok());
        assert!(validate_student_number("24-001").is_ok());
        assert!(validate_student_number("2024/00123").is_err());
        assert!(validate_student_number("").is_err());
    }

    #[test]
    fn test_program_and_year_level() {
        assert!(validate_program("IT").is_ok());
        assert!(validate_program("BSCS").is_ok());
        assert!(validate_program("it").is_err());
        assert!(validate_program("I").is_err());
        assert!(validate_year_level(1).is_ok());
        assert!(validate_year_level(6).is_ok());
        assert!(validate_year_level(0).is_err());
        assert!(validate_year_level(7).is_err());
    }

    #[test]
    fn test_school_year() {
        assert!(validate_school_year("2025-2026").is_ok());
        assert!(validate_school_year("2025-2027").is_err());
        assert!(validate_school_year("2025").is_err());
    }

    #[test]
    fn test_grade_range() {
        assert!(validate_grade(0.0, 0.0, 100.0).is_ok());
        assert!(validate_grade(100.0, 0.0, 100.0).is_ok());
        assert!(validate_grade(100.5, 0.0, 100.0).is_err());
        assert!(validate_grade(-1.0, 0.0, 100.0).is_err());
        assert!(validate_grade(f64::NAN, 0.0, 100.0).is_err());
    }
}
