/// 三次成绩的平均值，忽略未录入的项，保留两位小数
///
/// 三项都为空时返回 `None`。
pub fn average_grade(prelim: Option<f64>, midterm: Option<f64>, final_grade: Option<f64>) -> Option<f64> {
    mean([prelim, midterm, final_grade].into_iter().flatten())
}

/// 若干分数的平均值，保留两位小数，没有分数时为 `None`
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    Some(round2(sum / f64::from(count)))
}

// 四舍五入到两位小数（远离零）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_all_terms() {
        assert_eq!(average_grade(Some(85.0), Some(90.0), Some(95.0)), Some(90.0));
        assert_eq!(average_grade(Some(80.0), Some(85.0), Some(86.0)), Some(83.67));
    }

    #[test]
    fn test_average_ignores_missing_terms() {
        assert_eq!(average_grade(Some(80.0), None, Some(91.0)), Some(85.5));
        assert_eq!(average_grade(None, Some(77.0), None), Some(77.0));
        assert_eq!(average_grade(None, None, None), None);
    }

    #[test]
    fn test_average_is_order_independent() {
        let a = average_grade(Some(70.25), Some(88.0), None);
        let b = average_grade(None, Some(70.25), Some(88.0));
        let c = average_grade(Some(88.0), None, Some(70.25));
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(83.666_666), 83.67);
    }

    #[test]
    fn test_mean_of_empty_is_none() {
        assert_eq!(mean(Vec::new()), None);
        assert_eq!(mean(vec![75.0, 80.0]), Some(77.5));
    }
}
