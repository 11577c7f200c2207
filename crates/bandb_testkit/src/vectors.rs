//! Byte-level vectors for the ban file format.
//!
//! Other tools that read or write ban files can check themselves
//! against these. Each vector is a whole file, hex-encoded, with either
//! the entries it must load as or the reason it must be rejected.

use serde::{Deserialize, Serialize};

/// Expected contents of one loaded entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedEntry {
    /// Byte offset of the record.
    pub position: u64,
    /// Active flag.
    pub active: bool,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Duration in seconds.
    pub length: i64,
    /// SteamID.
    pub steamid: u64,
    /// IPv4 address.
    pub ip: u32,
    /// Reverse DNS.
    pub rdns: String,
    /// Player name.
    pub name: String,
    /// Ban reason.
    pub reason: String,
    /// Var block pairs in file order.
    pub var_data: Vec<(String, String)>,
}

/// A whole-file test vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// File contents (hex-encoded).
    pub file_hex: String,
    /// Entries the file loads as, if it is valid.
    pub expected_entries: Option<Vec<ExpectedEntry>>,
    /// Offset of the first bad record, if the file must be rejected.
    pub corrupt_at: Option<u64>,
}

const FOO_RECORD: &str = "01008ea4540000000000000000000000007b000000000000000100007f\
                          0000000003000000466f6f080000006368656174696e67010000000600\
                          000062616e6e65720500000061646d696e";

const BAR_RECORD: &str = "00008ea45400000000100e000000000000000000000000000001\
                          00a8c004000000686f737403000000426172040000007370616d\
                          00000000";

fn foo_entry() -> ExpectedEntry {
    ExpectedEntry {
        position: 1,
        active: true,
        timestamp: 1_420_070_400,
        length: 0,
        steamid: 123,
        ip: 0x7F00_0001,
        rdns: String::new(),
        name: "Foo".into(),
        reason: "cheating".into(),
        var_data: vec![("banner".into(), "admin".into())],
    }
}

fn bar_entry() -> ExpectedEntry {
    ExpectedEntry {
        position: 76,
        active: false,
        timestamp: 1_420_070_400,
        length: 3_600,
        steamid: 0,
        ip: 0xC0A8_0001,
        rdns: "host".into(),
        name: "Bar".into(),
        reason: "spam".into(),
        var_data: Vec::new(),
    }
}

/// Ban file format vectors.
pub fn format_vectors() -> Vec<FormatVector> {
    vec![
        FormatVector {
            id: "empty_database".into(),
            description: "Version byte only".into(),
            file_hex: "01".into(),
            expected_entries: Some(Vec::new()),
            corrupt_at: None,
        },
        FormatVector {
            id: "single_permanent_ban".into(),
            description: "One active permanent ban with a var block".into(),
            file_hex: format!("01{FOO_RECORD}"),
            expected_entries: Some(vec![foo_entry()]),
            corrupt_at: None,
        },
        FormatVector {
            id: "two_bans_second_lifted".into(),
            description: "Second record inactive, timed, no var block".into(),
            file_hex: format!("01{FOO_RECORD}{BAR_RECORD}"),
            expected_entries: Some(vec![foo_entry(), bar_entry()]),
            corrupt_at: None,
        },
        FormatVector {
            id: "truncated_first_record".into(),
            description: "Last two bytes of the only record missing".into(),
            file_hex: format!("01{}", &FOO_RECORD[..FOO_RECORD.len() - 4]),
            expected_entries: None,
            corrupt_at: Some(1),
        },
        FormatVector {
            id: "truncated_second_record".into(),
            description: "Second record cut inside its header".into(),
            file_hex: format!("01{FOO_RECORD}{}", &BAR_RECORD[..20]),
            expected_entries: None,
            corrupt_at: Some(76),
        },
    ]
}

/// Decodes a hex string into bytes.
///
/// # Errors
///
/// Returns a description of the problem if `hex` has an odd length or
/// holds anything other than hex digits.
pub fn hex_decode(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err(format!("odd-length hex string ({} digits)", hex.len()));
    }

    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            if !pair.iter().all(u8::is_ascii_hexdigit) {
                return Err(format!(
                    "invalid hex digits {:?}",
                    String::from_utf8_lossy(pair)
                ));
            }
            let digits = std::str::from_utf8(pair).map_err(|e| e.to_string())?;
            u8::from_str_radix(digits, 16).map_err(|e| e.to_string())
        })
        .collect()
}

/// Encodes bytes as lowercase hex.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandb_codec::Entry;
    use bandb_core::{BanDatabase, Config, CoreError};
    use bandb_storage::InMemoryBackend;

    fn to_expected(entry: &Entry) -> ExpectedEntry {
        ExpectedEntry {
            position: entry.position.as_u64(),
            active: entry.active,
            timestamp: entry.timestamp,
            length: entry.length,
            steamid: entry.steamid,
            ip: entry.ip,
            rdns: entry.rdns.clone(),
            name: entry.name.clone(),
            reason: entry.reason.clone(),
            var_data: entry
                .var_data
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn vectors_load_as_described() {
        for vector in format_vectors() {
            let backend = InMemoryBackend::with_data(hex_decode(&vector.file_hex).unwrap());
            let result = BanDatabase::open_with_backend(
                vector.id.clone(),
                Box::new(backend),
                Config::default(),
            );

            match (&vector.expected_entries, vector.corrupt_at) {
                (Some(expected), None) => {
                    let db = result.unwrap_or_else(|e| panic!("{}: {e}", vector.id));
                    let actual: Vec<_> = db.entries().iter().map(to_expected).collect();
                    assert_eq!(&actual, expected, "{}", vector.id);
                }
                (None, Some(at)) => match result {
                    Err(CoreError::CorruptRecord { offset, .. }) => {
                        assert_eq!(offset, at, "{}", vector.id);
                    }
                    other => panic!("{}: expected corruption, got {other:?}", vector.id),
                },
                _ => panic!("{}: vector must expect entries or corruption", vector.id),
            }
        }
    }

    #[test]
    fn valid_vectors_reencode_byte_for_byte() {
        for vector in format_vectors() {
            if vector.expected_entries.is_none() {
                continue;
            }
            let bytes = hex_decode(&vector.file_hex).unwrap();
            let db = BanDatabase::open_with_backend(
                vector.id.clone(),
                Box::new(InMemoryBackend::with_data(bytes.clone())),
                Config::default(),
            )
            .unwrap();

            let mut out = Vec::new();
            BanDatabase::write_header(&mut out).unwrap();
            for entry in db.entries() {
                BanDatabase::write_to(entry, &mut out).unwrap();
            }
            assert_eq!(hex_encode(&out), vector.file_hex, "{}", vector.id);
        }
    }

    #[test]
    fn vectors_serialize_to_json() {
        let vectors = format_vectors();
        let json = serde_json::to_string_pretty(&vectors).unwrap();
        let parsed: Vec<FormatVector> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), vectors.len());
        assert_eq!(parsed[1].expected_entries, vectors[1].expected_entries);
    }

    #[test]
    fn hex_helpers_agree() {
        let bytes = [0x00, 0x7f, 0xff];
        assert_eq!(hex_encode(&bytes), "007fff");
        assert_eq!(hex_decode("007fff").unwrap(), bytes);
    }

    #[test]
    fn hex_decode_rejects_malformed_input() {
        assert!(hex_decode("abc").is_err());
        assert!(hex_decode("zz").is_err());
        assert!(hex_decode("+f").is_err());
        assert_eq!(hex_decode("").unwrap(), Vec::<u8>::new());
    }
}
