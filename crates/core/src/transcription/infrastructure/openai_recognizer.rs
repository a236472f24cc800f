use crate::audio::domain::audio_encoder::EncodedAudio;
use crate::shared::api_endpoint::ApiEndpoint;
use crate::shared::constants::{MAX_REMOTE_AUDIO_BYTES, TRANSCRIPTION_PATH};
use crate::transcription::domain::speech_recognizer::SpeechRecognizer;
use crate::transcription::domain::transcription_error::TranscriptionError;

/// Speech recognizer backed by the OpenAI audio transcription endpoint.
///
/// Requests the `text` response format, so the body is the transcript itself
/// rather than a JSON document with segments or timestamps.
pub struct OpenAiRecognizer {
    http: reqwest::blocking::Client,
    endpoint: ApiEndpoint,
    model: String,
}

impl OpenAiRecognizer {
    pub fn new(http: reqwest::blocking::Client, endpoint: ApiEndpoint, model: String) -> Self {
        Self {
            http,
            endpoint,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_form(
        &self,
        audio: &EncodedAudio,
    ) -> Result<reqwest::blocking::multipart::Form, TranscriptionError> {
        let audio_part = reqwest::blocking::multipart::Part::bytes(audio.bytes.clone())
            .file_name(audio.file_name.clone())
            .mime_str(&audio.mime_type)
            .map_err(TranscriptionError::Request)?;

        Ok(reqwest::blocking::multipart::Form::new()
            .part("file", audio_part)
            .text("model", self.model.clone())
            .text("response_format", "text"))
    }
}

impl SpeechRecognizer for OpenAiRecognizer {
    fn transcribe(&self, audio: &EncodedAudio) -> Result<String, TranscriptionError> {
        if audio.len() > MAX_REMOTE_AUDIO_BYTES {
            return Err(TranscriptionError::PayloadTooLarge {
                size_bytes: audio.len(),
                limit_bytes: MAX_REMOTE_AUDIO_BYTES,
            });
        }

        log::debug!(
            "Sending {} ({} bytes) to {} with model {}",
            audio.file_name,
            audio.len(),
            self.endpoint.base_url(),
            self.model
        );

        let form = self.build_form(audio)?;
        let request = self.http.post(self.endpoint.url(TRANSCRIPTION_PATH));
        let response = self
            .endpoint
            .authorize(request)
            .multipart(form)
            .send()
            .map_err(|e| {
                log::error!("Transcription request error: {e}");
                TranscriptionError::Request(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Transcription API error response ({status}): {body}");
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().map_err(TranscriptionError::Body)?;
        log::info!("Transcription successful: {} characters", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    /// Serves a single HTTP exchange on an ephemeral port and hands back the
    /// raw request it received.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });
        (base_url, handle)
    }

    /// Reads headers, then a `Content-Length` or chunked body.
    fn read_request(stream: &mut impl Read) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw);
            let Some(header_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let headers = text[..header_end].to_lowercase();
            let body_len = raw.len() - (header_end + 4);
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());
            let complete = match content_length {
                Some(len) => body_len >= len,
                None => text.ends_with("0\r\n\r\n"),
            };
            if complete {
                break;
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn local_client() -> reqwest::blocking::Client {
        reqwest::blocking::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    fn recognizer(base_url: &str) -> OpenAiRecognizer {
        OpenAiRecognizer::new(
            crate::shared::api_endpoint::build_http_client(Duration::from_secs(2)).unwrap(),
            ApiEndpoint::new(base_url, "sk-test"),
            "whisper-1".to_string(),
        )
    }

    #[test]
    fn test_oversized_payload_rejected_before_sending() {
        let audio = EncodedAudio::new(
            vec![0u8; MAX_REMOTE_AUDIO_BYTES + 1],
            "big.mp3",
            "audio/mpeg",
        );
        let result = recognizer("http://127.0.0.1:1").transcribe(&audio);
        assert!(matches!(
            result,
            Err(TranscriptionError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_unreachable_host_is_request_error() {
        let audio = EncodedAudio::new(vec![1, 2, 3], "a.mp3", "audio/mpeg");
        let result = recognizer("http://127.0.0.1:1").transcribe(&audio);
        assert!(matches!(result, Err(TranscriptionError::Request(_))));
    }

    #[test]
    fn test_invalid_mime_type_is_error() {
        let audio = EncodedAudio::new(vec![1, 2, 3], "a.mp3", "not a mime type");
        let result = recognizer("http://127.0.0.1:1").transcribe(&audio);
        assert!(result.is_err());
    }

    #[test]
    fn test_transcript_body_returned_verbatim() {
        let (base_url, server) = serve_once("200 OK", "hello world\n");
        let recognizer = OpenAiRecognizer::new(
            local_client(),
            ApiEndpoint::new(base_url, "sk-test"),
            "whisper-1".to_string(),
        );
        let audio = EncodedAudio::new(b"ID3fake".to_vec(), "talk.mp3", "audio/mpeg");

        let transcript = recognizer.transcribe(&audio).unwrap();
        let request = server.join().unwrap();

        assert_eq!(transcript, "hello world\n");
        assert!(request.starts_with("POST /v1/audio/transcriptions "));
        assert!(request
            .to_lowercase()
            .contains("authorization: bearer sk-test"));
        assert!(request.contains("name=\"response_format\"\r\n\r\ntext\r\n"));
        assert!(request.contains("name=\"model\"\r\n\r\nwhisper-1\r\n"));
        assert!(request.contains("name=\"file\"; filename=\"talk.mp3\""));
        assert!(request.contains("Content-Type: audio/mpeg"));
        assert!(request.contains("ID3fake"));
    }

    #[test]
    fn test_error_status_returns_api_error_with_body() {
        let (base_url, server) = serve_once("401 Unauthorized", "invalid api key");
        let recognizer = OpenAiRecognizer::new(
            local_client(),
            ApiEndpoint::new(base_url, "sk-bad"),
            "whisper-1".to_string(),
        );
        let audio = EncodedAudio::new(vec![1, 2, 3], "talk.mp3", "audio/mpeg");

        let result = recognizer.transcribe(&audio);
        server.join().unwrap();

        match result {
            Err(TranscriptionError::Api { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_model_accessor() {
        assert_eq!(recognizer("http://localhost").model(), "whisper-1");
    }
}
