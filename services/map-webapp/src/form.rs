//! The map request form: parsing, validation and HTML rendering.

use darn_common::{MapDate, TimeOfDay};
use serde::Deserialize;

/// Raw form fields as submitted. Missing fields deserialize empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MapForm {
    pub date: String,
    pub integration_time: String,
    pub start_time: String,
}

/// A form that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapRequest {
    pub date: MapDate,
    pub integration_time: u32,
    pub start_time: TimeOfDay,
}

impl MapRequest {
    /// Plot end time: start plus one integration period, clamped to 23:59.
    pub fn end_time(&self) -> TimeOfDay {
        self.start_time
            .add_seconds_clamped(i64::from(self.integration_time))
    }

    /// Name of the first plot page, as served from the static dir.
    pub fn image_name(&self) -> String {
        format!("{}.{}.00.png", self.date, self.start_time.compact())
    }
}

impl MapForm {
    /// The form the page opens with.
    pub fn initial() -> Self {
        Self {
            integration_time: "120".to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<MapRequest, Vec<String>> {
        let mut errors = Vec::new();

        let date = required(&self.date, "Date", &mut errors).and_then(|v| {
            v.parse::<MapDate>()
                .map_err(|_| errors.push(format!("Date '{}' must be YYYYMMDD", v)))
                .ok()
        });

        let integration_time = required(&self.integration_time, "Integration time", &mut errors)
            .and_then(|v| match v.parse::<u32>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    errors.push(format!(
                        "Integration time '{}' must be a positive number of seconds",
                        v
                    ));
                    None
                }
            });

        let start_time = required(&self.start_time, "Start time", &mut errors).and_then(|v| {
            v.parse::<TimeOfDay>()
                .map_err(|_| errors.push(format!("Start time '{}' must be HH:MM", v)))
                .ok()
        });

        match (date, integration_time, start_time) {
            (Some(date), Some(integration_time), Some(start_time)) if errors.is_empty() => {
                Ok(MapRequest {
                    date,
                    integration_time,
                    start_time,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required<'a>(value: &'a str, label: &str, errors: &mut Vec<String>) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(format!("{} is required", label));
        None
    } else {
        Some(value)
    }
}

/// Render the form page, with any errors and the produced image.
pub fn render_page(form: &MapForm, errors: &[String], image: Option<&str>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>SuperDARN Convection Maps</title>\n</head>\n<body>\n\
         <h1>SuperDARN Convection Maps</h1>\n",
    );

    if !errors.is_empty() {
        html.push_str("<ul class=\"errors\">\n");
        for error in errors {
            html.push_str(&format!("<li>{}</li>\n", escape_html(error)));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<form method=\"post\" action=\"/\">\n");
    for (name, label, value, placeholder) in [
        ("date", "Date", &form.date, "YYYYMMDD"),
        (
            "integration_time",
            "Integration time (s)",
            &form.integration_time,
            "120",
        ),
        ("start_time", "Start time", &form.start_time, "HH:MM"),
    ] {
        html.push_str(&format!(
            "<label for=\"{name}\">{label}</label>\n\
             <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\" placeholder=\"{placeholder}\">\n",
            value = escape_html(value),
        ));
    }
    html.push_str("<button type=\"submit\">Generate</button>\n</form>\n");

    if let Some(image) = image {
        html.push_str(&format!(
            "<img src=\"/static/{}\" alt=\"Convection map\">\n",
            escape_html(image)
        ));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
