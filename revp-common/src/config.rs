//! Environment configuration
//!
//! Everything the service talks to is configured through process environment
//! variables. Sink settings are required-if-used: a sink whose variables are
//! absent is disabled, never an error. The synthesis service is the primary
//! response path, so its credentials are mandatory.
//!
//! Empty or whitespace-only values count as absent.

use tracing::{info, warn};

use crate::taxonomy::Category;
use crate::{Error, Result};

pub const DEFAULT_AI_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_AI_MODEL: &str = "@cf/google/gemma-3-12b-it";
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// Generative text service settings (Cloudflare Workers AI REST API)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisConfig {
    pub account_id: String,
    pub api_token: String,
    pub model: String,
    pub base_url: String,
}

impl SynthesisConfig {
    /// Resolve from a variable lookup
    ///
    /// Fails with `Error::Config` when the account id or API token is missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| is_valid_value(v));

        let account_id = get("CLOUDFLARE_ACCOUNT_ID").ok_or_else(|| {
            Error::Config("CLOUDFLARE_ACCOUNT_ID is not set".to_string())
        })?;
        let api_token = get("CLOUDFLARE_API_TOKEN").ok_or_else(|| {
            Error::Config("CLOUDFLARE_API_TOKEN is not set".to_string())
        })?;

        Ok(Self {
            account_id,
            api_token,
            model: get("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            base_url: get("AI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
        })
    }
}

/// Google Sheets append settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub api_key: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub base_url: String,
}

/// Form entry ids, one per recorded field
///
/// A field without an id is left out of the form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFieldIds {
    pub timestamp: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub review_text: Option<String>,
    pub tags: Option<String>,
    pub environment: Option<String>,
    pub taste: Option<String>,
    pub service: Option<String>,
    pub price: Option<String>,
    pub overall: Option<String>,
}

impl FormFieldIds {
    /// Entry id for a category bucket
    pub fn category(&self, category: Category) -> Option<&str> {
        match category {
            Category::Environment => self.environment.as_deref(),
            Category::Taste => self.taste.as_deref(),
            Category::Service => self.service.as_deref(),
            Category::Price => self.price.as_deref(),
            Category::Overall => self.overall.as_deref(),
        }
    }
}

/// Form submission endpoint settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    pub url: String,
    pub fields: FormFieldIds,
}

/// Settings for every recording sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkConfig {
    pub webhook_url: Option<String>,
    pub backup_webhook_url: Option<String>,
    pub sheets: Option<SheetsConfig>,
    pub form: Option<FormConfig>,
}

impl SinkConfig {
    /// Resolve from a variable lookup; never fails
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| is_valid_value(v));

        let sheets = match (
            get("GOOGLE_SHEETS_API_KEY"),
            get("SPREADSHEET_ID"),
            get("SHEET_NAME"),
        ) {
            (Some(api_key), Some(spreadsheet_id), Some(sheet_name)) => Some(SheetsConfig {
                api_key,
                spreadsheet_id,
                sheet_name,
                base_url: get("GOOGLE_SHEETS_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_SHEETS_BASE_URL.to_string()),
            }),
            (None, None, None) => None,
            _ => {
                warn!(
                    "Google Sheets partially configured (need GOOGLE_SHEETS_API_KEY, SPREADSHEET_ID, SHEET_NAME); sheet sink disabled"
                );
                None
            }
        };

        let form = get("GOOGLE_FORM_URL").map(|url| FormConfig {
            url,
            fields: FormFieldIds {
                timestamp: get("GOOGLE_FORM_ENTRY_TIMESTAMP"),
                date: get("GOOGLE_FORM_ENTRY_DATE"),
                time: get("GOOGLE_FORM_ENTRY_TIME"),
                review_text: get("GOOGLE_FORM_ENTRY_REVIEW_TEXT"),
                tags: get("GOOGLE_FORM_ENTRY_TAGS"),
                environment: get("GOOGLE_FORM_ENTRY_ENVIRONMENT"),
                taste: get("GOOGLE_FORM_ENTRY_TASTE"),
                service: get("GOOGLE_FORM_ENTRY_SERVICE"),
                price: get("GOOGLE_FORM_ENTRY_PRICE"),
                overall: get("GOOGLE_FORM_ENTRY_OVERALL"),
            },
        });

        Self {
            webhook_url: get("WEBHOOK_URL"),
            backup_webhook_url: get("BACKUP_WEBHOOK_URL"),
            sheets,
            form,
        }
    }

    /// Log which sinks are enabled
    pub fn log_summary(&self) {
        let sinks = [
            ("webhook", self.webhook_url.is_some()),
            ("backup_webhook", self.backup_webhook_url.is_some()),
            ("google_sheets", self.sheets.is_some()),
            ("google_form", self.form.is_some()),
        ];

        for (name, enabled) in sinks {
            if enabled {
                info!(sink = name, "Sink configured");
            } else {
                warn!(sink = name, "Sink not configured; deliveries will be skipped");
            }
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub synthesis: SynthesisConfig,
    pub sinks: SinkConfig,
}

impl ServiceConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            synthesis: SynthesisConfig::from_lookup(&lookup)?,
            sinks: SinkConfig::from_lookup(&lookup),
        })
    }

    /// Resolve from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Validate a configured value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}
