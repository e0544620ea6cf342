use crate::briefing::context_aware_briefing;
use crate::db::AppState;
use crate::llm::{ChatTurn, GeminiClient, LlmError};
use crate::timeline::{resolve_from, session_day_number, TimelineStatus};
use crate::weather::{WeatherClient, WeatherData};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// ---------------------------------------------------------------------------
/// Offline Messages
/// ---------------------------------------------------------------------------

pub const CHAT_OFFLINE: &str = "COMMS LINK OFFLINE.";
pub const CHAT_FAILED: &str = "Link compromised. Try again later.";

/// ---------------------------------------------------------------------------
/// Weather
/// ---------------------------------------------------------------------------

/// Today's weather at the configured location. None when no location is set
/// or the lookup fails; the briefing carries on without UV data.
pub async fn get_weather(state: &AppState) -> Option<WeatherData> {
  let location = state.config.location?;
  let client = WeatherClient::new(state.config.weather_api_url.clone());

  match client.fetch(location).await {
    Ok(weather) => Some(weather),
    Err(e) => {
      log::warn!("Weather lookup failed: {}", e);
      None
    }
  }
}

/// ---------------------------------------------------------------------------
/// Mission Briefing
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefingSource {
  Ai,
  Offline,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefingReport {
  pub timeline: TimelineStatus,
  pub weather: Option<WeatherData>,
  pub source: BriefingSource,
  pub text: String,
}

pub async fn get_briefing(state: &AppState) -> Result<BriefingReport, String> {
  let mut rng = StdRng::from_entropy();
  briefing_on(state, super::today(), &mut rng).await
}

/// Build the briefing for `reference`: weather first, then the AI briefing,
/// falling back to the offline catalog when the AI is unavailable
pub async fn briefing_on<R: Rng + ?Sized>(
  state: &AppState,
  reference: NaiveDate,
  rng: &mut R,
) -> Result<BriefingReport, String> {
  let settings = crate::settings::load_settings(&state.db).await?;
  let timeline = resolve_from(&settings.start_date, reference);

  let weather = get_weather(state).await;
  let uv_index = weather.map(|w| w.uv_index).unwrap_or(0.0);

  let ai_text = match GeminiClient::from_config(&state.config) {
    Ok(client) => match client
      .mission_briefing(timeline.phase, &timeline.session, uv_index)
      .await
    {
      Ok(text) => Some(text),
      Err(e) => {
        log::warn!("AI briefing failed, using offline catalog: {}", e);
        None
      }
    },
    Err(LlmError::MissingApiKey) => {
      log::debug!("No Gemini API key, using offline catalog");
      None
    }
    Err(e) => {
      log::warn!("Gemini client unavailable: {}", e);
      None
    }
  };

  let (source, text) = match ai_text {
    Some(text) => (BriefingSource::Ai, text),
    None => {
      let text = context_aware_briefing(timeline.phase, session_day_number(reference), uv_index, rng);
      (BriefingSource::Offline, text.to_string())
    }
  };

  Ok(BriefingReport {
    timeline,
    weather,
    source,
    text,
  })
}

/// ---------------------------------------------------------------------------
/// Intel Officer Chat
/// ---------------------------------------------------------------------------

/// Ask the intel officer. Missing keys and failed calls answer with a fixed
/// offline message instead of an error.
pub async fn chat_with_officer(
  state: &AppState,
  message: &str,
  history: &[ChatTurn],
) -> Result<String, String> {
  let message = message.trim();
  if message.is_empty() {
    return Err("Message cannot be empty".to_string());
  }

  let client = match GeminiClient::from_config(&state.config) {
    Ok(client) => client,
    Err(e) => {
      log::debug!("Chat unavailable: {}", e);
      return Ok(CHAT_OFFLINE.to_string());
    }
  };

  match client.chat(message, history).await {
    Ok(reply) => Ok(reply),
    Err(e) => {
      log::warn!("Intel officer chat failed: {}", e);
      Ok(CHAT_FAILED.to_string())
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
