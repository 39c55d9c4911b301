use crate::bar::{BarConfig, ButtonConfig};

const NAV_LABEL: &str = "Mobile navigation";

/// Markup for the bar: one link or trigger button per configured slot.
///
/// Root-relative urls are resolved against `home_url`.
#[must_use]
pub fn render_bar(config: &BarConfig, home_url: &str) -> String {
    let mut html = format!(
        r#"<nav class="fvd-mbb" aria-label="{NAV_LABEL}"><div class="fvd-mbb__inner">"#
    );
    for button in &config.buttons {
        render_button(&mut html, button, home_url);
    }
    html.push_str("</div></nav>");
    html
}

fn render_button(html: &mut String, button: &ButtonConfig, home_url: &str) {
    let href = escape_attr(&link_target(&button.url, home_url));
    let label = escape_attr(&button.label);
    let style = format!("color:{};font-size:{}px", button.color, button.size);
    let icon = format!(
        r#"<span class="{}" aria-hidden="true"></span>"#,
        escape_attr(&button.icon_class())
    );

    if button.action_type.is_trigger() {
        html.push_str(&format!(
            r#"<button type="button" class="fvd-mbb__item fvd-mbb__item--trigger" aria-label="{label}" style="{style}" data-fvd-action="{action}" data-fvd-provider="{provider}" data-fvd-selector="{selector}" data-fvd-fallback="{href}">{icon}</button>"#,
            action = button.action_type.as_str(),
            provider = button.integration_provider.as_str(),
            selector = escape_attr(button.effective_selector()),
        ));
    } else {
        html.push_str(&format!(
            r#"<a href="{href}" class="fvd-mbb__item" aria-label="{label}" style="{style}">{icon}</a>"#
        ));
    }
}

fn link_target(url: &str, home_url: &str) -> String {
    if url.starts_with('/') && !url.starts_with("//") {
        format!("{}{url}", home_url.trim_end_matches('/'))
    } else {
        url.to_string()
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Inline rule block: background color plus the media query that shows the
/// bar inside its visibility range.
#[must_use]
pub fn render_styles(config: &BarConfig) -> String {
    let mut css = format!(
        ".fvd-mbb{{display:none;background:{}}}",
        config.background_color
    );
    let conditions = config.visible_range().media_conditions();
    if conditions.is_empty() {
        css.push_str(".fvd-mbb{display:block}");
    } else {
        css.push_str(&format!(
            "@media {}{{.fvd-mbb{{display:block}}}}",
            conditions.join(" and ")
        ));
    }
    css
}
