//! Canned wire data for tests.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// A minimal but well-formed NTLM type-2 (challenge) message.
///
/// Layout per MS-NLMP: signature, message type, target name fields, flags,
/// an 8-byte server challenge, reserved bytes, target info fields, then the
/// target name and AV-pair payload. Flags advertise Unicode, NTLM, extended
/// session security, and target info, which is what IIS sends in practice.
#[must_use]
pub fn ntlm_challenge_token() -> Vec<u8> {
    const FLAGS: u32 = 0xE088_8205;
    const PAYLOAD_OFFSET: u32 = 48;

    let target_name = utf16le("MOCK");
    let mut target_info = Vec::new();
    av_pair(&mut target_info, 2, "MOCK"); // NetBIOS domain name
    av_pair(&mut target_info, 1, "MOCK"); // NetBIOS computer name
    target_info.extend_from_slice(&[0, 0, 0, 0]); // MsvAvEOL

    let mut token = Vec::with_capacity(PAYLOAD_OFFSET as usize + target_name.len() + target_info.len());
    token.extend_from_slice(b"NTLMSSP\0");
    token.extend_from_slice(&2u32.to_le_bytes());
    // Target name fields: len, maxlen, offset
    token.extend_from_slice(&(target_name.len() as u16).to_le_bytes());
    token.extend_from_slice(&(target_name.len() as u16).to_le_bytes());
    token.extend_from_slice(&PAYLOAD_OFFSET.to_le_bytes());
    token.extend_from_slice(&FLAGS.to_le_bytes());
    token.extend_from_slice(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]);
    token.extend_from_slice(&[0u8; 8]);
    // Target info fields: len, maxlen, offset
    let info_offset = PAYLOAD_OFFSET + target_name.len() as u32;
    token.extend_from_slice(&(target_info.len() as u16).to_le_bytes());
    token.extend_from_slice(&(target_info.len() as u16).to_le_bytes());
    token.extend_from_slice(&info_offset.to_le_bytes());
    token.extend_from_slice(&target_name);
    token.extend_from_slice(&target_info);
    token
}

/// [`ntlm_challenge_token`] as the base64 string carried in a
/// `WWW-Authenticate: NTLM` header.
#[must_use]
pub fn ntlm_challenge_base64() -> String {
    BASE64.encode(ntlm_challenge_token())
}

/// An empty result set as the REST endpoints return it.
#[must_use]
pub fn empty_rows_json() -> &'static str {
    r#"{"rows":[]}"#
}

/// A small analog-definition result set.
#[must_use]
pub fn analog_rows_json() -> &'static str {
    r#"{"rows":[{"IP_PLANT_AREA":"A1","Name":"FC101.PV","IP_DESCRIPTION":"Feed flow"}]}"#
}

fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn av_pair(out: &mut Vec<u8>, id: u16, value: &str) {
    let encoded = utf16le(value);
    out.extend_from_slice(&id.to_le_bytes());
    out.extend_from_slice(&(encoded.len() as u16).to_le_bytes());
    out.extend_from_slice(&encoded);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn challenge_token_shape() {
        let token = ntlm_challenge_token();
        assert_eq!(&token[..8], b"NTLMSSP\0");
        assert_eq!(&token[8..12], &[2, 0, 0, 0]);
        // Target name "MOCK" in UTF-16LE at offset 48.
        assert_eq!(&token[48..56], &utf16le("MOCK")[..]);
        // Target info ends with MsvAvEOL.
        assert_eq!(&token[token.len() - 4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn challenge_base64_roundtrips() {
        let decoded = BASE64.decode(ntlm_challenge_base64()).unwrap();
        assert_eq!(decoded, ntlm_challenge_token());
    }
}
