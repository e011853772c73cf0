// File: content.rs
// Location: /src/content.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Substituted whenever the computed payload ends up empty, so the symbol
/// generator always has something to encode.
pub const FALLBACK_CONTENT: &str = "https://example.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Url,
    Text,
    Wifi,
    Vcard,
    Sms,
    Email,
    Event,
    Crypto,
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Url
    }
}

impl DataType {
    pub const ALL: [DataType; 8] = [
        DataType::Url,
        DataType::Text,
        DataType::Wifi,
        DataType::Vcard,
        DataType::Sms,
        DataType::Email,
        DataType::Event,
        DataType::Crypto,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            DataType::Url => "url",
            DataType::Text => "text",
            DataType::Wifi => "wifi",
            DataType::Vcard => "vcard",
            DataType::Sms => "sms",
            DataType::Email => "email",
            DataType::Event => "event",
            DataType::Crypto => "crypto",
        }
    }

    pub fn parse(tag: &str) -> Option<DataType> {
        DataType::ALL.iter().copied().find(|t| t.tag() == tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Short,
    Long,
    Password,
    Select(&'static [SelectOption]),
    Checkbox,
    Numeric,
    DateTime,
}

/// Static descriptor of one input field of a data type.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: &'static str,
}

static ENCRYPTION_OPTIONS: [SelectOption; 3] = [
    SelectOption { value: "WPA", label: "WPA/WPA2" },
    SelectOption { value: "WEP", label: "WEP" },
    SelectOption { value: "nopass", label: "Open network" },
];

static CRYPTO_OPTIONS: [SelectOption; 3] = [
    SelectOption { value: "bitcoin", label: "Bitcoin" },
    SelectOption { value: "ethereum", label: "Ethereum" },
    SelectOption { value: "solana", label: "Solana" },
];

static URL_FIELDS: [FieldSpec; 1] = [FieldSpec {
    id: "url",
    label: "URL",
    kind: FieldKind::Short,
    required: true,
    placeholder: "https://example.com",
}];

static TEXT_FIELDS: [FieldSpec; 1] = [FieldSpec {
    id: "text",
    label: "Text",
    kind: FieldKind::Long,
    required: true,
    placeholder: "Write your message...",
}];

static WIFI_FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        id: "ssid",
        label: "Network name (SSID)",
        kind: FieldKind::Short,
        required: true,
        placeholder: "WiFi-Network",
    },
    FieldSpec {
        id: "password",
        label: "Password",
        kind: FieldKind::Password,
        required: false,
        placeholder: "",
    },
    FieldSpec {
        id: "encryption",
        label: "Security",
        kind: FieldKind::Select(&ENCRYPTION_OPTIONS),
        required: false,
        placeholder: "",
    },
    FieldSpec {
        id: "hidden",
        label: "Hidden network",
        kind: FieldKind::Checkbox,
        required: false,
        placeholder: "",
    },
];

static VCARD_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        id: "firstName",
        label: "First name",
        kind: FieldKind::Short,
        required: true,
        placeholder: "Jane",
    },
    FieldSpec {
        id: "lastName",
        label: "Last name",
        kind: FieldKind::Short,
        required: false,
        placeholder: "Doe",
    },
    FieldSpec {
        id: "phone",
        label: "Phone",
        kind: FieldKind::Short,
        required: false,
        placeholder: "+1 555 123 4567",
    },
    FieldSpec {
        id: "vcardEmail",
        label: "Email",
        kind: FieldKind::Short,
        required: false,
        placeholder: "jane@example.com",
    },
    FieldSpec {
        id: "organization",
        label: "Organization",
        kind: FieldKind::Short,
        required: false,
        placeholder: "ACME Corp",
    },
];

static SMS_FIELDS: [FieldSpec; 2] = [
    FieldSpec {
        id: "smsPhone",
        label: "Phone",
        kind: FieldKind::Short,
        required: true,
        placeholder: "+1 555 123 4567",
    },
    FieldSpec {
        id: "smsMessage",
        label: "Message",
        kind: FieldKind::Long,
        required: false,
        placeholder: "Your SMS message...",
    },
];

static EMAIL_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        id: "emailTo",
        label: "Recipient",
        kind: FieldKind::Short,
        required: true,
        placeholder: "someone@example.com",
    },
    FieldSpec {
        id: "emailSubject",
        label: "Subject",
        kind: FieldKind::Short,
        required: false,
        placeholder: "Email subject",
    },
    FieldSpec {
        id: "emailBody",
        label: "Message",
        kind: FieldKind::Long,
        required: false,
        placeholder: "Email body...",
    },
];

static EVENT_FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        id: "eventTitle",
        label: "Event",
        kind: FieldKind::Short,
        required: true,
        placeholder: "Meeting",
    },
    FieldSpec {
        id: "eventStart",
        label: "Start",
        kind: FieldKind::DateTime,
        required: true,
        placeholder: "",
    },
    FieldSpec {
        id: "eventEnd",
        label: "End",
        kind: FieldKind::DateTime,
        required: false,
        placeholder: "",
    },
    FieldSpec {
        id: "eventLocation",
        label: "Location",
        kind: FieldKind::Short,
        required: false,
        placeholder: "Office",
    },
];

static CRYPTO_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        id: "cryptoType",
        label: "Currency",
        kind: FieldKind::Select(&CRYPTO_OPTIONS),
        required: false,
        placeholder: "",
    },
    FieldSpec {
        id: "cryptoAddress",
        label: "Wallet address",
        kind: FieldKind::Short,
        required: true,
        placeholder: "0x...",
    },
    FieldSpec {
        id: "cryptoAmount",
        label: "Amount",
        kind: FieldKind::Numeric,
        required: false,
        placeholder: "0.001",
    },
];

pub fn fields_for(data_type: DataType) -> &'static [FieldSpec] {
    match data_type {
        DataType::Url => &URL_FIELDS,
        DataType::Text => &TEXT_FIELDS,
        DataType::Wifi => &WIFI_FIELDS,
        DataType::Vcard => &VCARD_FIELDS,
        DataType::Sms => &SMS_FIELDS,
        DataType::Email => &EMAIL_FIELDS,
        DataType::Event => &EVENT_FIELDS,
        DataType::Crypto => &CRYPTO_FIELDS,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

/// Raw field values for the active data type, keyed by field identifier.
/// Missing fields read as empty string or false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValues(HashMap<String, FieldValue>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: &str, value: impl Into<String>) -> &mut Self {
        self.0.insert(id.to_string(), FieldValue::Text(value.into()));
        self
    }

    pub fn set_flag(&mut self, id: &str, value: bool) -> &mut Self {
        self.0.insert(id.to_string(), FieldValue::Flag(value));
        self
    }

    pub fn text(&self, id: &str) -> &str {
        match self.0.get(id) {
            Some(FieldValue::Text(value)) => value,
            _ => "",
        }
    }

    pub fn flag(&self, id: &str) -> bool {
        matches!(self.0.get(id), Some(FieldValue::Flag(true)))
    }
}

/// Builds the exact text payload the QR symbol will carry. Total: every
/// input produces a payload, with missing fields treated as empty strings
/// and a blank result replaced by [`FALLBACK_CONTENT`].
pub fn encode(data_type: DataType, values: &FieldValues) -> String {
    let content = match data_type {
        DataType::Url => values.text("url").to_string(),
        DataType::Text => values.text("text").to_string(),
        DataType::Wifi => encode_wifi(values),
        DataType::Vcard => encode_vcard(values),
        DataType::Sms => format!("SMSTO:{}:{}", values.text("smsPhone"), values.text("smsMessage")),
        DataType::Email => encode_email(values),
        DataType::Event => encode_event(values),
        DataType::Crypto => encode_crypto(values),
    };

    if content.trim().is_empty() {
        FALLBACK_CONTENT.to_string()
    } else {
        content
    }
}

fn encode_wifi(values: &FieldValues) -> String {
    let encryption = match values.text("encryption") {
        "" => "WPA",
        other => other,
    };
    let hidden = if values.flag("hidden") { "true" } else { "false" };

    format!(
        "WIFI:T:{};S:{};P:{};H:{};;",
        encryption,
        values.text("ssid"),
        values.text("password"),
        hidden
    )
}

fn encode_vcard(values: &FieldValues) -> String {
    format!(
        "BEGIN:VCARD\nVERSION:3.0\nFN:{} {}\nTEL:{}\nEMAIL:{}\nORG:{}\nEND:VCARD",
        values.text("firstName"),
        values.text("lastName"),
        values.text("phone"),
        values.text("vcardEmail"),
        values.text("organization")
    )
}

fn encode_email(values: &FieldValues) -> String {
    // The recipient stays verbatim; only subject and body are encoded.
    format!(
        "mailto:{}?subject={}&body={}",
        values.text("emailTo"),
        urlencoding::encode(values.text("emailSubject")),
        urlencoding::encode(values.text("emailBody"))
    )
}

fn encode_event(values: &FieldValues) -> String {
    format!(
        "BEGIN:VEVENT\nSUMMARY:{}\nDTSTART:{}\nDTEND:{}\nLOCATION:{}\nEND:VEVENT",
        values.text("eventTitle"),
        format_event_timestamp(values.text("eventStart")),
        format_event_timestamp(values.text("eventEnd")),
        values.text("eventLocation")
    )
}

/// `2024-06-01T10:30` -> `20240601103000Z`: dashes and colons dropped, the
/// first `T` removed, literal seconds-and-zone suffix appended. Applied to
/// empty input this yields the bare `00Z` suffix.
fn format_event_timestamp(value: &str) -> String {
    let stripped: String = value.chars().filter(|c| !matches!(c, '-' | ':')).collect();
    format!("{}00Z", stripped.replacen('T', "", 1))
}

fn encode_crypto(values: &FieldValues) -> String {
    let currency = match values.text("cryptoType") {
        "" => "bitcoin",
        other => other,
    };
    let scheme = match currency {
        "bitcoin" => "bitcoin",
        "ethereum" => "ethereum",
        _ => "solana",
    };

    let address = values.text("cryptoAddress");
    let amount = values.text("cryptoAmount");
    if amount.is_empty() {
        format!("{}:{}", scheme, address)
    } else {
        format!("{}:{}?amount={}", scheme, address, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_total() {
        let empty = FieldValues::new();
        for data_type in DataType::ALL {
            let payload = encode(data_type, &empty);
            assert!(!payload.trim().is_empty(), "{:?} produced blank payload", data_type);
        }
    }

    #[test]
    fn test_empty_url_falls_back() {
        assert_eq!(encode(DataType::Url, &FieldValues::new()), FALLBACK_CONTENT);

        let mut blank = FieldValues::new();
        blank.set("text", "   ");
        assert_eq!(encode(DataType::Text, &blank), FALLBACK_CONTENT);
    }

    #[test]
    fn test_url_verbatim() {
        let mut values = FieldValues::new();
        values.set("url", "https://rust-lang.org/?q=1&r=2");
        assert_eq!(encode(DataType::Url, &values), "https://rust-lang.org/?q=1&r=2");
    }

    #[test]
    fn test_wifi_positional_fields() {
        let mut values = FieldValues::new();
        values
            .set("ssid", "MyNet")
            .set("password", "secret")
            .set("encryption", "WPA")
            .set_flag("hidden", false);
        assert_eq!(
            encode(DataType::Wifi, &values),
            "WIFI:T:WPA;S:MyNet;P:secret;H:false;;"
        );
    }

    #[test]
    fn test_wifi_empty_segments_kept() {
        let values = FieldValues::new();
        assert_eq!(encode(DataType::Wifi, &values), "WIFI:T:WPA;S:;P:;H:false;;");
    }

    #[test]
    fn test_wifi_hidden_open_network() {
        let mut values = FieldValues::new();
        values.set("ssid", "Cafe").set("encryption", "nopass").set_flag("hidden", true);
        assert_eq!(encode(DataType::Wifi, &values), "WIFI:T:nopass;S:Cafe;P:;H:true;;");
    }

    #[test]
    fn test_vcard_shape() {
        let mut values = FieldValues::new();
        values
            .set("firstName", "Jane")
            .set("lastName", "Doe")
            .set("phone", "+1555")
            .set("vcardEmail", "jane@example.com")
            .set("organization", "ACME");
        assert_eq!(
            encode(DataType::Vcard, &values),
            "BEGIN:VCARD\nVERSION:3.0\nFN:Jane Doe\nTEL:+1555\nEMAIL:jane@example.com\nORG:ACME\nEND:VCARD"
        );
    }

    #[test]
    fn test_vcard_single_space_with_missing_last_name() {
        let mut values = FieldValues::new();
        values.set("firstName", "Jane");
        let payload = encode(DataType::Vcard, &values);
        assert!(payload.contains("\nFN:Jane \n"));
    }

    #[test]
    fn test_sms() {
        let mut values = FieldValues::new();
        values.set("smsPhone", "+1555").set("smsMessage", "see you at 5");
        assert_eq!(encode(DataType::Sms, &values), "SMSTO:+1555:see you at 5");
    }

    #[test]
    fn test_email_encodes_subject_and_body_only() {
        let mut values = FieldValues::new();
        values
            .set("emailTo", "a@b.com")
            .set("emailSubject", "Hi there")
            .set("emailBody", "X&Y");
        assert_eq!(
            encode(DataType::Email, &values),
            "mailto:a@b.com?subject=Hi%20there&body=X%26Y"
        );
    }

    #[test]
    fn test_event_timestamp_transform() {
        assert_eq!(format_event_timestamp("2024-06-01T10:30"), "20240601103000Z");
        assert_eq!(format_event_timestamp(""), "00Z");
    }

    #[test]
    fn test_event_payload() {
        let mut values = FieldValues::new();
        values
            .set("eventTitle", "Standup")
            .set("eventStart", "2024-06-01T10:30")
            .set("eventLocation", "Office");
        assert_eq!(
            encode(DataType::Event, &values),
            "BEGIN:VEVENT\nSUMMARY:Standup\nDTSTART:20240601103000Z\nDTEND:00Z\nLOCATION:Office\nEND:VEVENT"
        );
    }

    #[test]
    fn test_crypto_amount_optional() {
        let mut values = FieldValues::new();
        values.set("cryptoType", "bitcoin").set("cryptoAddress", "1A2b");
        assert_eq!(encode(DataType::Crypto, &values), "bitcoin:1A2b");

        values.set("cryptoAmount", "0.5");
        assert_eq!(encode(DataType::Crypto, &values), "bitcoin:1A2b?amount=0.5");
    }

    #[test]
    fn test_crypto_scheme_selection() {
        let mut values = FieldValues::new();
        values.set("cryptoAddress", "abc");
        assert!(encode(DataType::Crypto, &values).starts_with("bitcoin:"));

        values.set("cryptoType", "ethereum");
        assert!(encode(DataType::Crypto, &values).starts_with("ethereum:"));

        values.set("cryptoType", "solana");
        assert!(encode(DataType::Crypto, &values).starts_with("solana:"));
    }

    #[test]
    fn test_data_type_tags_roundtrip() {
        for data_type in DataType::ALL {
            assert_eq!(DataType::parse(data_type.tag()), Some(data_type));
        }
        assert_eq!(DataType::parse("unknown"), None);
    }

    #[test]
    fn test_field_tables_mark_required_fields() {
        let fields = fields_for(DataType::Wifi);
        assert_eq!(fields[0].id, "ssid");
        assert!(fields[0].required);
        assert!(matches!(fields[2].kind, FieldKind::Select(_)));
        assert_eq!(fields_for(DataType::Crypto).len(), 3);
    }
}
