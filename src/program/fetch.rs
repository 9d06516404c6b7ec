// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bytes::Bytes;
use tracing::info;
use url::Url;

use crate::error::{FeedError, FetchError, ParseError};
use crate::http::HttpClient;

use super::schema::ProgramDocument;

/// URL of the JSON document that backs a program page
pub fn program_json_url(program_url: &str) -> String {
    format!("{}.json", program_url.trim_end_matches('/'))
}

/// Fetch raw program document bytes (without parsing)
pub async fn fetch_program_bytes<C: HttpClient>(
    client: &C,
    program_url: &str,
) -> Result<Bytes, FetchError> {
    let url = program_json_url(program_url);
    info!(%url, "fetching program metadata");

    let failed = |e| FetchError::RequestFailed {
        url: url.clone(),
        source: e,
    };

    let response = client.get_stream(&url).await.map_err(failed)?;

    if !response.is_success() {
        return Err(FetchError::HttpStatus {
            url,
            status: response.status,
        });
    }

    response.bytes().await.map_err(failed)
}

/// Decode program document bytes into the typed schema
pub fn parse_program(bytes: &[u8], program_url: &Url) -> Result<ProgramDocument, ParseError> {
    serde_json::from_slice(bytes).map_err(|e| ParseError::InvalidDocument {
        url: program_json_url(program_url.as_str()),
        source: e,
    })
}

/// Fetch and decode the program document behind a program page
pub async fn fetch_program<C: HttpClient>(
    client: &C,
    program_url: &Url,
) -> Result<ProgramDocument, FeedError> {
    let bytes = fetch_program_bytes(client, program_url.as_str()).await?;
    Ok(parse_program(&bytes, program_url)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::http::{ByteStream, HttpResponse};
    use async_trait::async_trait;

    struct MockHttpClient {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get_stream(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
            let data = Bytes::from_static(self.body.as_bytes());
            let stream: ByteStream = Box::pin(futures::stream::once(async move { Ok(data) }));

            Ok(HttpResponse {
                status: self.status,
                url: url.to_string(),
                content_length: Some(self.body.len() as u64),
                body: stream,
            })
        }
    }

    #[test]
    fn json_url_appends_extension() {
        assert_eq!(
            program_json_url("https://www.raiplaysound.it/programmi/ilruggitodelconiglio"),
            "https://www.raiplaysound.it/programmi/ilruggitodelconiglio.json"
        );
    }

    #[test]
    fn json_url_trims_trailing_slash() {
        assert_eq!(
            program_json_url("https://www.raiplaysound.it/programmi/radio2/"),
            "https://www.raiplaysound.it/programmi/radio2.json"
        );
    }

    #[tokio::test]
    async fn fetch_returns_body_on_success() {
        let client = MockHttpClient {
            status: 200,
            body: r#"{"title": "x"}"#,
        };

        let bytes = fetch_program_bytes(&client, "https://example.com/programmi/x")
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"title": "x"}"#);
    }

    #[tokio::test]
    async fn fetch_fails_on_http_error() {
        let client = MockHttpClient {
            status: 404,
            body: "Not Found",
        };

        let result = fetch_program_bytes(&client, "https://example.com/programmi/x").await;

        match result.unwrap_err() {
            FetchError::HttpStatus { url, status } => {
                assert_eq!(status, 404);
                assert_eq!(url, "https://example.com/programmi/x.json");
            }
            _ => panic!("Expected HttpStatus error"),
        }
    }

    #[tokio::test]
    async fn fetch_program_decodes_document() {
        let client = MockHttpClient {
            status: 200,
            body: r#"{
                "title": "Program",
                "podcast_info": {"image": "/c.jpg", "genres": [], "subgenres": [], "dfp": {}},
                "block": {"cards": []}
            }"#,
        };
        let url = Url::parse("https://example.com/programmi/x").unwrap();

        let doc = fetch_program(&client, &url).await.unwrap();
        assert_eq!(doc.title, "Program");
    }

    #[test]
    fn parse_rejects_malformed_document() {
        let url = Url::parse("https://example.com/programmi/x").unwrap();
        let result = parse_program(br#"{"title": 5}"#, &url);

        assert!(matches!(result, Err(ParseError::InvalidDocument { .. })));
    }
}
