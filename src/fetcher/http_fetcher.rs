use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::app::{MushafError, Result};
use crate::config::ApiConfig;
use crate::domain::Verse;
use crate::fetcher::ContentSource;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: u16,
    #[serde(default)]
    status: String,
    data: T,
}

#[derive(Debug, Deserialize)]
struct EditionPayload {
    #[serde(default)]
    ayahs: Vec<Verse>,
}

pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("mushaf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = Url::parse(&config.base_url)?;

        Ok(Self { client, base_url })
    }

    /// `{base}/surah/{chapter}/{edition}`
    fn edition_url(&self, chapter: u16, edition: &str) -> Result<Url> {
        self.surah_url(&[chapter.to_string().as_str(), edition])
    }

    /// `{base}/surah/{chapter}/editions/{a},{b}`
    fn editions_url(&self, chapter: u16, editions: &[&str]) -> Result<Url> {
        self.surah_url(&[
            chapter.to_string().as_str(),
            "editions",
            editions.join(",").as_str(),
        ])
    }

    fn surah_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MushafError::Config(format!("Invalid API base URL: {}", self.base_url)))?
            .pop_if_empty()
            .push("surah")
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ContentSource for HttpFetcher {
    async fn fetch_editions(&self, chapter: u16, editions: &[&str]) -> Result<Vec<Vec<Verse>>> {
        let body = self.get(self.editions_url(chapter, editions)?).await?;
        parse_editions(&body)
    }

    async fn fetch_edition(&self, chapter: u16, edition: &str) -> Result<Vec<Verse>> {
        let body = self.get(self.edition_url(chapter, edition)?).await?;
        parse_edition(&body)
    }
}

/// Decode the `{code, status, data}` envelope, rejecting non-200 codes
/// before looking at `data` (error responses carry a plain string there).
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_slice(body)?;
    if envelope.code != 200 {
        return Err(MushafError::Api(format!(
            "code {} ({})",
            envelope.code, envelope.status
        )));
    }
    Ok(serde_json::from_value(envelope.data)?)
}

pub fn parse_edition(body: &[u8]) -> Result<Vec<Verse>> {
    let payload: EditionPayload = decode(body)?;
    Ok(payload.ayahs)
}

pub fn parse_editions(body: &[u8]) -> Result<Vec<Vec<Verse>>> {
    let payloads: Vec<EditionPayload> = decode(body)?;
    Ok(payloads.into_iter().map(|e| e.ayahs).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "number": 112,
            "name": "سُورَةُ الإِخۡلَاصِ",
            "englishName": "Al-Ikhlaas",
            "numberOfAyahs": 4,
            "ayahs": [
                {"number": 6222, "text": "Say: He is God, the One", "numberInSurah": 1, "juz": 30},
                {"number": 6223, "text": "God, the Eternal", "numberInSurah": 2, "juz": 30}
            ],
            "edition": {"identifier": "en.asad", "format": "text", "type": "translation"}
        }
    }"#;

    const MULTI: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": [
            {"number": 112, "ayahs": [{"number": 6222, "text": "قُلْ هُوَ ٱللَّهُ أَحَدٌ", "numberInSurah": 1}]},
            {"number": 112, "ayahs": [{"number": 6222, "text": "قُلْ هُوَ ٱللَّهُ أَحَدٌ", "numberInSurah": 1,
                "audio": "https://cdn.islamic.network/quran/audio/128/ar.alafasy/6222.mp3",
                "audioSecondary": []}]}
        ]
    }"#;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&ApiConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_single_edition() {
        let verses = parse_edition(SINGLE.as_bytes()).unwrap();
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[1].number_in_surah, 2);
        assert_eq!(verses[1].text, "God, the Eternal");
    }

    #[test]
    fn test_parse_multiple_editions_keeps_order() {
        let editions = parse_editions(MULTI.as_bytes()).unwrap();
        assert_eq!(editions.len(), 2);
        assert_eq!(editions[0][0].primary_audio(), None);
        assert!(editions[1][0].primary_audio().unwrap().ends_with("6222.mp3"));
    }

    #[test]
    fn test_error_code_is_rejected() {
        let body = br#"{"code": 404, "status": "NOT FOUND", "data": "Not found."}"#;
        assert!(matches!(parse_edition(body), Err(MushafError::Api(_))));
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        assert!(matches!(
            parse_edition(b"<html>bad gateway</html>"),
            Err(MushafError::Json(_))
        ));
    }

    #[test]
    fn test_urls() {
        let fetcher = fetcher();
        assert_eq!(
            fetcher.edition_url(1, "en.asad").unwrap().as_str(),
            "https://api.alquran.cloud/v1/surah/1/en.asad"
        );
        assert_eq!(
            fetcher
                .editions_url(2, &["quran-uthmani", "ar.alafasy"])
                .unwrap()
                .as_str(),
            "https://api.alquran.cloud/v1/surah/2/editions/quran-uthmani,ar.alafasy"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let config = ApiConfig {
            base_url: "http://localhost:8080/v1/".into(),
            ..ApiConfig::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        assert_eq!(
            fetcher.edition_url(3, "en.transliteration").unwrap().as_str(),
            "http://localhost:8080/v1/surah/3/en.transliteration"
        );
    }
}
