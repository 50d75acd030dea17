//! Hook installer.
//!
//! [`CaseConverter`] owns one [`KeyTransformer`] per direction and knows how
//! to apply them to request and response descriptors. [`install`] registers
//! both on a [`HookChain`] and hands back the handles.

use crate::config::{ConfigError, ConverterConfig};
use crate::hooks::{HookChain, HookError, HookHandles, RequestConfig, Response};
use crate::matcher::{ExclusionSet, KeyMatcher, MatcherError};
use crate::transformer::{count_keys, Direction, KeyTransformer};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Exclusion lists for both directions. Defaults to excluding nothing.
#[derive(Debug, Clone, Default)]
pub struct ConverterOptions {
    /// Keys kept verbatim in outgoing params and bodies
    pub request_exclude: ExclusionSet,
    /// Keys kept verbatim in incoming response bodies
    pub response_exclude: ExclusionSet,
}

impl ConverterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_exclude<I, M>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<KeyMatcher>,
    {
        self.request_exclude = rules.into_iter().collect();
        self
    }

    pub fn with_response_exclude<I, M>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<KeyMatcher>,
    {
        self.response_exclude = rules.into_iter().collect();
        self
    }
}

impl TryFrom<&ConverterConfig> for ConverterOptions {
    type Error = MatcherError;

    fn try_from(config: &ConverterConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            request_exclude: ExclusionSet::compile(&config.request_exclude)?,
            response_exclude: ExclusionSet::compile(&config.response_exclude)?,
        })
    }
}

/// Request and response key-case converter.
#[derive(Debug, Clone)]
pub struct CaseConverter {
    request: KeyTransformer,
    response: KeyTransformer,
}

impl Default for CaseConverter {
    fn default() -> Self {
        Self::new(ConverterOptions::default())
    }
}

impl CaseConverter {
    /// Create a converter from options.
    pub fn new(options: ConverterOptions) -> Self {
        Self {
            request: KeyTransformer::new(Direction::Outbound, options.request_exclude),
            response: KeyTransformer::new(Direction::Inbound, options.response_exclude),
        }
    }

    /// Create from parsed configuration, compiling its patterns.
    pub fn from_config(config: &ConverterConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(ConverterOptions::try_from(config)?))
    }

    /// Create from a YAML configuration string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::from_config(&ConverterConfig::from_yaml(yaml)?)
    }

    /// Create from a JSON configuration string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_config(&ConverterConfig::from_json(json)?)
    }

    pub fn request_transformer(&self) -> &KeyTransformer {
        &self.request
    }

    pub fn response_transformer(&self) -> &KeyTransformer {
        &self.response
    }

    /// Convert an outgoing request.
    ///
    /// Params win: when present and not `null` they are converted and the
    /// body is left alone. Otherwise the body is converted unless it is
    /// absent or already a serialized string.
    pub fn transform_request(&self, request: RequestConfig) -> RequestConfig {
        if let Some(params) = request.params.as_ref().filter(|p| !p.is_null()) {
            let params = self.request.transform(params);
            debug!(
                target_field = "params",
                keys = count_keys(&params),
                "Converted request keys"
            );
            return RequestConfig {
                params: Some(params),
                ..request
            };
        }

        let Some(body) = request.body.as_ref() else {
            trace!("No request params or body to convert");
            return request;
        };
        if body.is_string() {
            trace!("Request body already serialized, passing through");
            return request;
        }

        let body = self.request.transform(body);
        debug!(
            target_field = "body",
            keys = count_keys(&body),
            "Converted request keys"
        );
        RequestConfig {
            body: Some(body),
            ..request
        }
    }

    /// Convert an incoming response. Falsy bodies pass through.
    pub fn transform_response(&self, response: Response) -> Response {
        if response.has_empty_body() {
            trace!(status = response.status, "Empty response body, passing through");
            return response;
        }

        let body = self.response.transform(&response.body);
        debug!(
            status = response.status,
            keys = count_keys(&body),
            "Converted response keys"
        );
        Response { body, ..response }
    }

    /// Register this converter on `chain`.
    pub fn install<C>(self, chain: &mut C) -> HookHandles
    where
        C: HookChain + ?Sized,
    {
        let request_exclusions = self.request.exclusions().len();
        let response_exclusions = self.response.exclusions().len();
        let converter = Arc::new(self);

        let outbound = {
            let converter = Arc::clone(&converter);
            chain.register_outbound(
                Arc::new(move |request: RequestConfig| Ok(converter.transform_request(request))),
                Arc::new(|err: HookError| {
                    warn!(
                        direction = %Direction::Outbound,
                        error = %err,
                        "Passing request error through"
                    );
                    Err(err)
                }),
            )
        };

        let inbound = chain.register_inbound(
            Arc::new(move |response: Response| Ok(converter.transform_response(response))),
            Arc::new(|err: HookError| {
                warn!(
                    direction = %Direction::Inbound,
                    error = %err,
                    "Passing response error through"
                );
                Err(err)
            }),
        );

        info!(
            outbound_hook = outbound.id(),
            inbound_hook = inbound.id(),
            request_exclusions,
            response_exclusions,
            "Key case converter installed"
        );

        HookHandles { outbound, inbound }
    }
}

/// Install key-case conversion hooks on `chain`.
pub fn install<C>(chain: &mut C, options: ConverterOptions) -> HookHandles
where
    C: HookChain + ?Sized,
{
    CaseConverter::new(options).install(chain)
}

/// Install with no exclusions.
pub fn install_default<C>(chain: &mut C) -> HookHandles
where
    C: HookChain + ?Sized,
{
    install(chain, ConverterOptions::default())
}
