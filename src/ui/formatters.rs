use humansize::{format_size, BINARY};

/// Format a byte count with binary units (KiB, MiB, GiB)
pub fn bytes_to_string(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Convert a limit expressed in MiB to bytes
pub fn mb_to_bytes(mb: u32) -> u64 {
    u64::from(mb) * 1024 * 1024
}

/// Format an uptime in seconds: `Xd Yh Zm` past one day, `Yh Zm Ss` below
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else {
        format!("{}h {}m {}s", hours, minutes, seconds)
    }
}

/// Uppercase the first character, lowercase the rest
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
