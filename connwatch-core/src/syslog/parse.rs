use crate::event::RawMessageRecord;
use crate::syslog::DecodeError;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// "Mmm dd hh:mm:ss"
const RFC3164_TIMESTAMP_LEN: usize = 15;

/// Decode one framed syslog message into a record.
///
/// Hostname, application name and message text must all be present; a
/// record missing any of them is rejected rather than half-filled.
pub fn decode(frame: &str) -> Result<RawMessageRecord, DecodeError> {
    let rest = strip_priority(frame)?;

    match rest.strip_prefix("1 ") {
        Some(rest) => decode_rfc5424(rest),
        None => decode_rfc3164(rest),
    }
}

fn strip_priority(frame: &str) -> Result<&str, DecodeError> {
    let inner = frame.strip_prefix('<').ok_or(DecodeError::MissingPriority)?;
    let (pri, rest) = inner.split_once('>').ok_or(DecodeError::MissingPriority)?;

    let valid = (1..=3).contains(&pri.len())
        && pri.bytes().all(|b| b.is_ascii_digit())
        && pri.parse::<u8>().is_ok_and(|p| p <= 191);

    if valid {
        Ok(rest)
    } else {
        Err(DecodeError::MissingPriority)
    }
}

//------------------------------------------------------------------------------
// RFC 5424: TIMESTAMP HOSTNAME APP-NAME PROCID MSGID SD [MSG]
//------------------------------------------------------------------------------
fn decode_rfc5424(rest: &str) -> Result<RawMessageRecord, DecodeError> {
    let mut fields = rest.splitn(6, ' ');
    let _timestamp = fields.next();
    let host = nil_to_none(fields.next()).ok_or(DecodeError::MissingHostname)?;
    let app = nil_to_none(fields.next()).ok_or(DecodeError::MissingAppName)?;
    let _procid = fields.next();
    let _msgid = fields.next();
    let remainder = fields.next().ok_or(DecodeError::MissingMessage)?;

    let message = skip_structured_data(remainder).ok_or(DecodeError::MissingMessage)?;
    let message = message.strip_prefix('\u{feff}').unwrap_or(message);

    if message.is_empty() {
        return Err(DecodeError::MissingMessage);
    }

    Ok(RawMessageRecord::new(host, app, message))
}

fn nil_to_none(field: Option<&str>) -> Option<&str> {
    field.filter(|f| !f.is_empty() && *f != "-")
}

/// Returns the text after the SD section, or `None` if there is no MSG part.
fn skip_structured_data(s: &str) -> Option<&str> {
    if let Some(msg) = s.strip_prefix('-') {
        return msg.strip_prefix(' ');
    }

    let bytes = s.as_bytes();
    let mut i = 0;
    while bytes.get(i) == Some(&b'[') {
        let mut escaped = false;
        i += 1;
        loop {
            match bytes.get(i)? {
                b'\\' if !escaped => escaped = true,
                b']' if !escaped => break,
                _ => escaped = false,
            }
            i += 1;
        }
        i += 1;
    }

    if i == 0 {
        return None;
    }

    s[i..].strip_prefix(' ')
}

//------------------------------------------------------------------------------
// RFC 3164: Mmm dd hh:mm:ss HOSTNAME TAG[PID]: MSG
//------------------------------------------------------------------------------
fn decode_rfc3164(rest: &str) -> Result<RawMessageRecord, DecodeError> {
    let rest = match rest.get(..RFC3164_TIMESTAMP_LEN) {
        Some(ts) if is_rfc3164_timestamp(ts) => {
            rest[RFC3164_TIMESTAMP_LEN..].trim_start_matches(' ')
        }
        _ => rest,
    };

    let (host, rest) = rest.split_once(' ').unwrap_or((rest, ""));
    if host.is_empty() {
        return Err(DecodeError::MissingHostname);
    }

    let tag_end = rest.find([':', '[', ' ']).unwrap_or(rest.len());
    let (tag, mut rest) = rest.split_at(tag_end);
    if tag.is_empty() {
        return Err(DecodeError::MissingAppName);
    }

    if rest.starts_with('[') {
        rest = rest.split_once(']').map(|(_, r)| r).unwrap_or("");
    }
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let message = rest.strip_prefix(' ').unwrap_or(rest);

    if message.is_empty() {
        return Err(DecodeError::MissingMessage);
    }

    Ok(RawMessageRecord::new(host, tag, message))
}

fn is_rfc3164_timestamp(ts: &str) -> bool {
    let b = ts.as_bytes();
    ts.get(..3).is_some_and(|m| MONTHS.contains(&m))
        && b[3] == b' '
        && (b[4] == b' ' || b[4].is_ascii_digit())
        && b[5].is_ascii_digit()
        && b[6] == b' '
        && b[7].is_ascii_digit()
        && b[8].is_ascii_digit()
        && b[9] == b':'
        && b[10].is_ascii_digit()
        && b[11].is_ascii_digit()
        && b[12] == b':'
        && b[13].is_ascii_digit()
        && b[14].is_ascii_digit()
}
