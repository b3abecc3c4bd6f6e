use std::time::Duration;

use crate::auth::{DEV_JWT_SECRET, JwtConfig};
use crate::notification::WhatsAppTransport;
use crate::utils::AppError;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_PATH | shop.db | SQLite 文件 |
/// | HTTP_PORT | 8000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | development / production |
/// | JWT_SECRET | (dev key) | production 必填 |
/// | JWT_EXPIRATION_MINUTES | 30 | 令牌有效期 |
/// | CORS_ORIGINS | http://localhost:3000,http://localhost:8080 | 逗号分隔 |
/// | WHATSAPP_PROVIDER | logging | disabled / logging / meta / twilio / generic |
/// | WHATSAPP_API_URL | - | provider endpoint |
/// | WHATSAPP_ACCESS_TOKEN | - | bearer / auth token |
/// | WHATSAPP_ACCOUNT_SID | - | Twilio account SID |
/// | WHATSAPP_FROM_NUMBER | +14155238886 | Twilio sender |
/// | ADMIN_WHATSAPP_NUMBER | +1234567890 | 新订单通知接收号码 |
/// | NOTIFICATION_TIMEOUT_SECS | 10 | 通知超时 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | LOG_DIR | - | 日志文件目录 |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub cors_origins: Vec<String>,
    pub whatsapp: WhatsAppTransport,
    pub admin_whatsapp_number: String,
    pub notification_timeout: Duration,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置 (先读取 `.env`)
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let parse_or = |key: &str, default: u64| -> Result<u64, AppError> {
            match get(key) {
                Some(v) => v
                    .parse()
                    .map_err(|_| AppError::config(format!("{key} must be a number, got '{v}'"))),
                None => Ok(default),
            }
        };

        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let is_production = environment == "production";

        let secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if is_production => {
                return Err(AppError::config("JWT_SECRET must be set in production"));
            }
            None => DEV_JWT_SECRET.to_string(),
        };
        let expiration_minutes = parse_or("JWT_EXPIRATION_MINUTES", 30)? as i64;

        let http_port = u16::try_from(parse_or("HTTP_PORT", 8000)?)
            .map_err(|_| AppError::config("HTTP_PORT out of range"))?;

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:8080".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let whatsapp = whatsapp_transport(&get)?;

        Ok(Self {
            database_path: get("DATABASE_PATH").unwrap_or_else(|| "shop.db".into()),
            http_port,
            environment,
            jwt: JwtConfig::new(secret, expiration_minutes),
            cors_origins,
            whatsapp,
            admin_whatsapp_number: get("ADMIN_WHATSAPP_NUMBER")
                .unwrap_or_else(|| "+1234567890".into()),
            notification_timeout: Duration::from_secs(parse_or("NOTIFICATION_TIMEOUT_SECS", 10)?),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: get("LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            log_dir: get("LOG_DIR"),
        })
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// JWT_SECRET was absent and the built-in key is signing tokens
    pub fn uses_dev_jwt_secret(&self) -> bool {
        self.jwt.secret == DEV_JWT_SECRET
    }
}

fn whatsapp_transport(get: &dyn Fn(&str) -> Option<String>) -> Result<WhatsAppTransport, AppError> {
    let provider = get("WHATSAPP_PROVIDER").unwrap_or_else(|| "logging".into());
    let require = |key: &str| {
        get(key).ok_or_else(|| {
            AppError::config(format!("{key} is required for WHATSAPP_PROVIDER={provider}"))
        })
    };

    let transport = match provider.to_ascii_lowercase().as_str() {
        "disabled" => WhatsAppTransport::Disabled,
        "logging" => WhatsAppTransport::LoggingOnly,
        "meta" => WhatsAppTransport::MetaCloud {
            api_url: require("WHATSAPP_API_URL")?,
            access_token: require("WHATSAPP_ACCESS_TOKEN")?,
        },
        "twilio" => WhatsAppTransport::Twilio {
            api_url: require("WHATSAPP_API_URL")?,
            account_sid: require("WHATSAPP_ACCOUNT_SID")?,
            auth_token: require("WHATSAPP_ACCESS_TOKEN")?,
            from_number: get("WHATSAPP_FROM_NUMBER").unwrap_or_else(|| "+14155238886".into()),
        },
        "generic" => WhatsAppTransport::Generic {
            api_url: require("WHATSAPP_API_URL")?,
            token: require("WHATSAPP_ACCESS_TOKEN")?,
        },
        other => {
            return Err(AppError::config(format!(
                "Unknown WHATSAPP_PROVIDER '{other}' (expected disabled, logging, meta, twilio or generic)"
            )));
        }
    };
    Ok(transport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.database_path, "shop.db");
        assert_eq!(cfg.http_port, 8000);
        assert!(!cfg.is_production());
        assert_eq!(cfg.jwt.secret, DEV_JWT_SECRET);
        assert!(cfg.uses_dev_jwt_secret());
        assert_eq!(cfg.jwt.expiration_minutes, 30);
        assert_eq!(cfg.cors_origins.len(), 2);
        assert!(matches!(cfg.whatsapp, WhatsAppTransport::LoggingOnly));
        assert_eq!(cfg.admin_whatsapp_number, "+1234567890");
        assert_eq!(cfg.notification_timeout, Duration::from_secs(10));
        assert!(!cfg.log_json);
        assert!(cfg.log_dir.is_none());
    }

    #[test]
    fn test_production_requires_jwt_secret() {
        let err = config(&[("ENVIRONMENT", "production")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);

        let cfg = config(&[("ENVIRONMENT", "production"), ("JWT_SECRET", "prod-secret")]).unwrap();
        assert!(cfg.is_production());
        assert_eq!(cfg.jwt.secret, "prod-secret");
        assert!(!cfg.uses_dev_jwt_secret());
    }

    #[test]
    fn test_provider_missing_credentials_is_config_error() {
        for provider in ["meta", "twilio", "generic"] {
            let err = config(&[("WHATSAPP_PROVIDER", provider)]).unwrap_err();
            assert_eq!(err.code, ErrorCode::ConfigError, "provider {provider}");
        }
        let err = config(&[("WHATSAPP_PROVIDER", "carrier-pigeon")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_twilio_provider() {
        let cfg = config(&[
            ("WHATSAPP_PROVIDER", "twilio"),
            ("WHATSAPP_API_URL", "https://api.twilio.com/2010-04-01/Accounts/AC1/Messages.json"),
            ("WHATSAPP_ACCESS_TOKEN", "tok"),
            ("WHATSAPP_ACCOUNT_SID", "AC1"),
        ])
        .unwrap();
        match cfg.whatsapp {
            WhatsAppTransport::Twilio {
                account_sid,
                from_number,
                ..
            } => {
                assert_eq!(account_sid, "AC1");
                assert_eq!(from_number, "+14155238886");
            }
            other => panic!("unexpected transport {other:?}"),
        }
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let err = config(&[("HTTP_PORT", "eighty")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
        let err = config(&[("HTTP_PORT", "70000")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }
}
