pub fn format_percent(fraction: f32) -> String {
    format!("{}%", (fraction * 100.0).round() as i32)
}

pub fn format_engagement(value: f32) -> String {
    format!("{value:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_whole_numbers() {
        assert_eq!(format_percent(0.814), "81%");
        assert_eq!(format_percent(0.25), "25%");
        assert_eq!(format_percent(1.0), "100%");
        assert_eq!(format_percent(0.0), "0%");
    }
}
