//! Elapsed/total time formatting

/// Convert whole seconds into a display string, e.g. `0:45`, `12:06`,
/// `1:34:47`. The hours field and its delimiter are omitted under an hour.
pub fn format_playback_time(seconds: u64) -> String {
    let secs = seconds % 60;
    let mins = (seconds / 60) % 60;
    let hours = seconds / 3600;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_under_an_hour() {
        assert_eq!(format_playback_time(0), "0:00");
        assert_eq!(format_playback_time(45), "0:45");
        assert_eq!(format_playback_time(125), "2:05");
        assert_eq!(format_playback_time(3599), "59:59");
    }

    #[test]
    fn hours_form_from_an_hour_up() {
        assert_eq!(format_playback_time(3600), "1:00:00");
        assert_eq!(format_playback_time(3661), "1:01:01");
        assert_eq!(format_playback_time(7 * 3600 + 34 * 60 + 47), "7:34:47");
    }
}
