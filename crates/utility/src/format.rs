//! Display helpers shared by the dashboard views.

/// Formats elapsed seconds as `"{minutes}m {seconds}s"`, flooring both parts.
pub fn elapsed(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{mins}m {secs}s")
}

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn kilometers(km: f64) -> String {
    format!("{km:.2} km")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_floors_minutes_and_seconds() {
        assert_eq!(elapsed(0.0), "0m 0s");
        assert_eq!(elapsed(59.9), "0m 59s");
        assert_eq!(elapsed(125.4), "2m 5s");
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("completed"), "Completed");
        assert_eq!(capitalize(""), "");
    }
}
