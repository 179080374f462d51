//! Stateful form postback against server-rendered pages.
//!
//! Pages built on server-side view state only answer a postback that
//! replays every hidden token they handed out. [`FormSession`] captures
//! those fields from an initial GET, lets the caller override a few, and
//! posts the whole set back to the same URL.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::SourceError;

pub const EVENT_TARGET: &str = "__EVENTTARGET";
pub const EVENT_ARGUMENT: &str = "__EVENTARGUMENT";
pub const VIEW_STATE: &str = "__VIEWSTATE";
pub const VIEW_STATE_GENERATOR: &str = "__VIEWSTATEGENERATOR";
pub const EVENT_VALIDATION: &str = "__EVENTVALIDATION";

static INPUT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input[name]").expect("valid selector"));
static SELECT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("select[name]").expect("valid selector"));
static OPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("option").expect("valid selector"));

/// Ordered name/value pairs of a page's form, as a browser would submit them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    /// Captures every named `<input>` and `<select>` in `html`.
    ///
    /// Inputs without a `value` attribute contribute an empty string.
    /// Buttons are skipped (posting one would mean clicking it), as are
    /// unchecked checkboxes and radios. A `<select>` contributes its
    /// selected option, or its first option.
    #[must_use]
    pub fn capture(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut fields = Self::default();

        for input in document.select(&INPUT_SELECTOR) {
            let element = input.value();
            let Some(name) = element.attr("name") else {
                continue;
            };
            let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
            match kind.as_str() {
                "submit" | "button" | "image" | "reset" | "file" => continue,
                "checkbox" | "radio" if element.attr("checked").is_none() => continue,
                _ => {}
            }
            fields.push(name, element.attr("value").unwrap_or_default());
        }

        for select in document.select(&SELECT_SELECTOR) {
            let Some(name) = select.value().attr("name") else {
                continue;
            };
            let mut options = select.select(&OPTION_SELECTOR);
            let first = options.next();
            let chosen = first
                .into_iter()
                .chain(options)
                .find(|o| o.value().attr("selected").is_some())
                .or(first);
            if let Some(option) = chosen {
                let value = option
                    .value()
                    .attr("value")
                    .map_or_else(|| option.text().collect::<String>(), str::to_string);
                fields.push(name, value.trim());
            }
        }

        fields
    }

    fn push(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    /// Replaces the first field called `name` in place, or appends it.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => self.push(name, value),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when the opaque server-state tokens are all present.
    #[must_use]
    pub fn has_view_state(&self) -> bool {
        [VIEW_STATE, VIEW_STATE_GENERATOR, EVENT_VALIDATION]
            .iter()
            .all(|token| self.get(token).is_some())
    }

    #[must_use]
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// The two HTTP exchanges a form session needs.
#[allow(async_fn_in_trait)]
pub trait FormTransport {
    /// Fetches `url` and returns the body of a successful response.
    async fn get(&self, url: &str) -> Result<String, SourceError>;

    /// Posts `fields` form-encoded to `url` and returns the response body.
    async fn post_form(&self, url: &str, fields: &[(String, String)])
        -> Result<String, SourceError>;
}

/// [`FormTransport`] over `reqwest`, with a cookie store so the session
/// cookie from the GET accompanies the POST.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the client cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }

    async fn read_html(response: reqwest::Response, url: &str) -> Result<String, SourceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }
}

impl FormTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;
        Self::read_html(response, url).await
    }

    async fn post_form(
        &self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<String, SourceError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .header(reqwest::header::REFERER, url)
            .form(fields)
            .send()
            .await?;
        Self::read_html(response, url).await
    }
}

/// Captured form state bound to one URL and transport.
pub struct FormSession<'t, T: FormTransport> {
    transport: &'t T,
    url: String,
    fields: FormFields,
}

impl<'t, T: FormTransport> FormSession<'t, T> {
    /// Fetches `url` and captures its form fields.
    ///
    /// # Errors
    ///
    /// - Any transport error from the GET.
    /// - [`SourceError::NoFormFields`] if the page has nothing to post back.
    pub async fn open(transport: &'t T, url: &str) -> Result<Self, SourceError> {
        let html = transport.get(url).await?;
        let fields = FormFields::capture(&html);
        if fields.is_empty() {
            return Err(SourceError::NoFormFields {
                url: url.to_owned(),
            });
        }
        tracing::debug!(
            url,
            field_count = fields.len(),
            has_view_state = fields.has_view_state(),
            "captured form state"
        );
        Ok(Self {
            transport,
            url: url.to_owned(),
            fields,
        })
    }

    #[must_use]
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn set_field(&mut self, name: &str, value: &str) {
        self.fields.set(name, value);
    }

    /// Posts the current field set back to the session URL.
    ///
    /// # Errors
    ///
    /// Any transport error from the POST.
    pub async fn submit(&self) -> Result<String, SourceError> {
        self.transport
            .post_form(&self.url, self.fields.as_pairs())
            .await
    }

    /// Simulates a control-triggered postback: sets the event target and
    /// argument, applies `overrides`, then submits.
    ///
    /// # Errors
    ///
    /// Any transport error from the POST.
    pub async fn submit_postback(
        mut self,
        event_target: &str,
        event_argument: &str,
        overrides: &[(&str, &str)],
    ) -> Result<String, SourceError> {
        self.set_field(EVENT_TARGET, event_target);
        self.set_field(EVENT_ARGUMENT, event_argument);
        for (name, value) in overrides {
            self.set_field(name, value);
        }
        self.submit().await
    }
}
