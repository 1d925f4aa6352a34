//! Label translators
//!
//! A translator turns a lower-case English entity name (`credit card`) into
//! the target language. Callers format the answer into a placeholder label.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::{LocaleError, Result};

/// Language entity names are written in
pub const SOURCE_LANGUAGE: &str = "en";

#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(&self, label: &str, target: &str) -> Result<String>;
}

const FR_LABELS: &[(&str, &str)] = &[
    ("email", "e-mail"),
    ("phone", "téléphone"),
    ("name", "nom"),
    ("amount", "montant"),
    ("date", "date"),
    ("address", "adresse"),
    ("credit card", "carte bancaire"),
    ("url", "lien"),
    ("ip", "adresse ip"),
    ("token", "jeton"),
    ("ssn", "numéro de sécurité sociale"),
    ("username", "identifiant"),
    ("cryptocurrency address", "adresse crypto"),
    ("code", "code"),
];

const DE_LABELS: &[(&str, &str)] = &[
    ("email", "e-mail"),
    ("phone", "telefon"),
    ("name", "name"),
    ("amount", "betrag"),
    ("date", "datum"),
    ("address", "adresse"),
    ("credit card", "kreditkarte"),
    ("url", "link"),
    ("ip", "ip-adresse"),
    ("token", "token"),
    ("ssn", "sozialversicherungsnummer"),
    ("username", "benutzername"),
    ("cryptocurrency address", "krypto-adresse"),
    ("code", "code"),
];

const ES_LABELS: &[(&str, &str)] = &[
    ("email", "correo"),
    ("phone", "teléfono"),
    ("name", "nombre"),
    ("amount", "importe"),
    ("date", "fecha"),
    ("address", "dirección"),
    ("credit card", "tarjeta de crédito"),
    ("url", "enlace"),
    ("ip", "dirección ip"),
    ("token", "token"),
    ("ssn", "número de seguridad social"),
    ("username", "usuario"),
    ("cryptocurrency address", "dirección cripto"),
    ("code", "código"),
];

const PL_LABELS: &[(&str, &str)] = &[
    ("email", "mail"),
    ("phone", "numer telefonu"),
    ("name", "osoba"),
    ("amount", "kwota"),
    ("date", "data"),
    ("address", "adres"),
    ("credit card", "numer konta"),
    ("url", "link"),
    ("ip", "adres ip"),
    ("token", "token"),
    ("ssn", "pesel"),
    ("username", "użytkownik"),
    ("cryptocurrency address", "adres kryptowaluty"),
    ("code", "kod"),
];

/// Offline translator backed by fixed label tables
#[derive(Debug, Clone, Default)]
pub struct DictionaryTranslator {
    tables: HashMap<String, HashMap<String, String>>,
}

impl DictionaryTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables for fr, de, es and pl covering the built-in entity types
    pub fn builtin() -> Self {
        [
            ("fr", FR_LABELS),
            ("de", DE_LABELS),
            ("es", ES_LABELS),
            ("pl", PL_LABELS),
        ]
        .into_iter()
        .fold(Self::new(), |translator, (language, labels)| {
            translator.with_labels(language, labels.iter().copied())
        })
    }

    /// Add or override entries for `language`
    pub fn with_labels<I, K, V>(mut self, language: &str, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.tables.entry(language.to_lowercase()).or_default();
        for (label, translation) in labels {
            table.insert(label.into().to_lowercase(), translation.into());
        }
        self
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

#[async_trait]
impl Translator for DictionaryTranslator {
    fn name(&self) -> &str {
        "dictionary"
    }

    async fn translate(&self, label: &str, target: &str) -> Result<String> {
        self.tables
            .get(&target.to_lowercase())
            .and_then(|table| table.get(&label.to_lowercase()))
            .cloned()
            .ok_or_else(|| LocaleError::Unsupported {
                label: label.to_string(),
                language: target.to_string(),
            })
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// Client for a LibreTranslate-compatible `/translate` endpoint
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranslator {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pshield/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    fn name(&self) -> &str {
        "http"
    }

    async fn translate(&self, label: &str, target: &str) -> Result<String> {
        let request = TranslateRequest {
            q: label,
            source: SOURCE_LANGUAGE,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LocaleError::Status(status.as_u16()));
        }

        let body: TranslateResponse = response.json().await?;
        debug!(target_language = target, "label translated");
        Ok(body.translated_text)
    }
}
