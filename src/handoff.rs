use crate::backend::types::TempCode;

/// Build the mobile hand-off URL from the station's two-part time-boxed code.
/// The visitor scans this from the welcome screen to continue on their phone.
pub fn handoff_url(origin: &str, station_id: i64, code: &TempCode) -> String {
    let token = urlencode(&format!("{}{}", code.0, code.1));
    format!(
        "{}/kiosk/{}/mobile/{}",
        origin.trim_end_matches('/'),
        station_id,
        token
    )
}

fn urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_both_code_parts() {
        let code = TempCode("ab12".into(), "cd34".into());
        assert_eq!(
            handoff_url("https://frontdesk.example.com", 5, &code),
            "https://frontdesk.example.com/kiosk/5/mobile/ab12cd34"
        );
    }

    #[test]
    fn code_parts_are_percent_encoded() {
        let code = TempCode("a+b".into(), "/c".into());
        assert_eq!(
            handoff_url("https://x.example", 1, &code),
            "https://x.example/kiosk/1/mobile/a%2Bb%2Fc"
        );
    }
}
