//! Cliente del servicio externo de reconocimiento de texto
//!
//! El núcleo nunca habla con servicios de imagen: este cliente es el
//! colaborador externo que convierte una foto en texto plano. Sus fallos se
//! propagan como `ExternalApi` o `Extraction` y se tratan como rutas de
//! error ordinarias.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::AppError;

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(rename = "ParsedResults")]
    parsed_results: Option<Vec<OcrParsedResult>>,
}

#[derive(Debug, Deserialize)]
struct OcrParsedResult {
    #[serde(rename = "ParsedText")]
    parsed_text: Option<String>,
}

/// Cliente HTTP hacia OCR.space
#[derive(Debug, Clone)]
pub struct RecognitionClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl RecognitionClient {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(40))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: config.ocr_api_url.clone(),
            api_key: config.ocr_api_key.clone(),
        }
    }

    /// Enviar una imagen al servicio y devolver el texto reconocido
    pub async fn parse_image(&self, image: Vec<u8>) -> Result<String, AppError> {
        log::info!("📷 Enviando imagen de {} bytes a OCR", image.len());

        let part = Part::bytes(image)
            .file_name("scan.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| AppError::ExternalApi(format!("Error preparando imagen: {}", e)))?;

        let form = Form::new()
            .part("file", part)
            .text("apikey", self.api_key.clone())
            .text("language", "eng")
            .text("OCREngine", "2");

        let response = self
            .client
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error llamando a OCR: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "OCR respondió con estado {}",
                status
            )));
        }

        let data: OcrResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta de OCR inválida: {}", e)))?;

        let text = data
            .parsed_results
            .and_then(|results| results.into_iter().next())
            .and_then(|r| r.parsed_text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::Extraction(
                "El servicio de OCR no reconoció texto en la imagen".to_string(),
            ));
        }

        log::info!("✅ OCR devolvió {} caracteres", text.len());
        Ok(text)
    }
}
