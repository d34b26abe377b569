//! JSON line encoding for log records

use super::error::Result;
use super::mdc::Mdc;
use serde::Serialize;

/// One serialized log line.
///
/// Field order is fixed: `ts`, `crit`, `id`, `mdc`, `msg`.
#[derive(Debug, Serialize)]
pub struct LogRecord<'a> {
    /// Milliseconds since the Unix epoch
    pub ts: i64,
    pub crit: &'a str,
    pub id: &'a str,
    pub mdc: &'a Mdc,
    pub msg: &'a str,
}

impl<'a> LogRecord<'a> {
    /// Append the record and a trailing newline to `buf`
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        serde_json::to_writer(&mut *buf, self)?;
        buf.push(b'\n');
        Ok(())
    }
}

/// Encode a record as a single newline-terminated JSON object.
///
/// serde_json leaves `<`, `>` and `&` untouched, so messages keep their
/// markup verbatim.
pub fn encode(ts: i64, crit: &str, id: &str, mdc: &Mdc, msg: &str) -> Result<Vec<u8>> {
    let record = LogRecord {
        ts,
        crit,
        id,
        mdc,
        msg,
    };
    let mut buf = Vec::with_capacity(96 + msg.len());
    record.write_to(&mut buf)?;
    Ok(buf)
}

/// Current wall clock time in milliseconds since the Unix epoch
#[inline]
pub fn current_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_field_order() {
        let line = encode(1_700_000_000_123, "DEBUG", "foo", &Mdc::new(), "test debug").unwrap();
        assert_eq!(
            String::from_utf8(line).unwrap(),
            "{\"ts\":1700000000123,\"crit\":\"DEBUG\",\"id\":\"foo\",\"mdc\":{},\"msg\":\"test debug\"}\n"
        );
    }

    #[test]
    fn test_encode_does_not_escape_html() {
        let line = encode(0, "INFO", "app", &Mdc::new(), "<b>a & b</b>").unwrap();
        let text = String::from_utf8(line).unwrap();
        assert!(text.contains("\"msg\":\"<b>a & b</b>\""));
        assert!(!text.contains("\\u003c"));
    }

    #[test]
    fn test_encode_with_mdc_parses_back() {
        let mut mdc = Mdc::new();
        mdc.add("foo", "bar");
        let line = encode(42, "INFO", "foo", &mdc, "test2").unwrap();

        let v: serde_json::Value = serde_json::from_slice(&line).unwrap();
        assert_eq!(v["ts"], 42);
        assert_eq!(v["crit"], "INFO");
        assert_eq!(v["msg"], "test2");
        assert_eq!(v["id"], "foo");
        assert_eq!(v["mdc"], serde_json::json!({"foo": "bar"}));
    }

    #[test]
    fn test_encode_single_line() {
        let line = encode(0, "ERROR", "app", &Mdc::new(), "first\nsecond").unwrap();
        let text = String::from_utf8(line).unwrap();
        assert_eq!(text.matches('\n').count(), 1);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_current_millis_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(current_millis() > 1_577_836_800_000);
    }
}
