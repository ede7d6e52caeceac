use tabled::builder::Builder;
use tabled::settings::Style;

use esg_core::transport::ApiResponse;

/// Render status and headers of a response as a two-column table.
pub fn render_response_head(response: &ApiResponse) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Header", "Value"]);
    builder.push_record([":status".to_string(), response.status.to_string()]);

    let mut headers = response.headers.clone();
    headers.sort();
    for (name, value) in headers {
        builder.push_record([name, value]);
    }

    builder.build().with(Style::rounded()).to_string()
}

/// Render key/value pairs, e.g. the inputs of a resolution.
pub fn render_pairs(pairs: &[(&str, String)]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Key", "Value"]);
    for (key, value) in pairs {
        builder.push_record([key.to_string(), value.clone()]);
    }
    builder.build().with(Style::rounded()).to_string()
}
