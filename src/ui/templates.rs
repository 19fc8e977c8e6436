//! # HTML Pages
//!
//! Builds the three pages the server returns (input form, plot, error) by plain
//! string formatting. Styling comes from Tailwind and the plot is drawn
//! client-side by Plotly, both loaded from their CDNs. Anything user-supplied is
//! HTML-escaped before it is spliced in, and data handed to the plot script is
//! serialized as JSON.

use html_escape::encode_text;
use serde::Serialize;

use crate::plot::PlotPayload;

const TAILWIND_CSS_URL: &str = "https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css";
const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const PAGE_TITLE: &str = "Tokenize, Plot and Predict";

fn page_head(extra: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link href="{css}" rel="stylesheet">
    {extra}
</head>
<body class="bg-gray-100 min-h-screen flex flex-col items-center justify-center space-y-6">
"#,
        title = PAGE_TITLE,
        css = TAILWIND_CSS_URL,
        extra = extra,
    )
}

const PAGE_FOOT: &str = "</body>\n</html>\n";

/// JSON for embedding inside a `<script>` block. `</` is escaped so a token can
/// never close the script element early.
fn script_json<T: Serialize + ?Sized>(value: &T) -> String {
    // Only string and number vectors come through here; serde_json cannot fail
    // on those (non-finite floats become `null`).
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

fn history_section(history: &[String]) -> String {
    let mut html = String::new();
    html.push_str(r#"<div class="bg-white shadow-md rounded-lg p-8 w-full max-w-md mt-6">"#);
    html.push_str(r#"<h2 class="text-xl font-semibold mb-4 text-center">Previous Inputs</h2>"#);
    if history.is_empty() {
        html.push_str(r#"<p class="text-gray-500 text-center">No previous inputs yet.</p>"#);
    } else {
        html.push_str(r#"<ul class="list-disc list-inside text-gray-700">"#);
        for sentence in history {
            html.push_str(&format!("<li>{}</li>", encode_text(sentence)));
        }
        html.push_str("</ul>");
    }
    html.push_str("</div>\n");
    html
}

/// The landing page: input form plus the shared history.
pub fn render_index_page(history: &[String]) -> String {
    let mut html = page_head("");
    html.push_str(
        r#"<div class="bg-white shadow-md rounded-lg p-8 w-full max-w-md">
    <h1 class="text-3xl font-bold mb-6 text-center">Tokenize, Plot &amp; Predict</h1>
    <p class="text-gray-600 mb-4 text-center">Enter a sentence below to see its tokens, visualize the results, and predict the next token length.</p>
    <form action="/tokenize" method="post" class="space-y-4">
        <label class="block text-gray-700 font-semibold" for="sentence">Enter a sentence:</label>
        <input type="text" id="sentence" name="sentence" class="w-full px-4 py-2 border rounded-md text-gray-800" placeholder="Type your sentence here" required />
        <button type="submit" class="w-full bg-blue-500 hover:bg-blue-600 text-white font-bold py-2 px-4 rounded">Tokenize, Plot &amp; Predict</button>
        <a href="/" class="text-gray-500 text-center block mt-2">Reset</a>
    </form>
</div>
"#,
    );
    html.push_str(&history_section(history));
    html.push_str(PAGE_FOOT);
    html
}

/// The result page: token list, prediction and the 3D scatter plot.
pub fn render_plot_page(payload: &PlotPayload) -> String {
    let mut html = page_head(&format!(r#"<script src="{}" charset="utf-8"></script>"#, PLOTLY_JS_URL));

    let tokens_text = if payload.tokens.is_empty() {
        "(none)".to_string()
    } else {
        encode_text(&payload.tokens.join(", ")).into_owned()
    };
    let prediction_text = match &payload.prediction {
        Some(prediction) => prediction.to_string(),
        None => "n/a".to_string(),
    };

    html.push_str(&format!(
        r#"<div class="bg-white shadow-md rounded-lg p-8 w-full max-w-3xl">
    <h1 class="text-2xl font-bold mb-4 text-center">3D Token Plot</h1>
    <p class="text-center mb-4 text-gray-700">Tokens: <strong>{tokens}</strong></p>
    <p class="text-center mb-6 text-gray-700">Prediction: The predicted next token length is: <strong>{prediction}</strong> characters</p>
    <div id="plot" class="h-96"></div>
</div>
<a href="/" class="text-blue-500 hover:text-blue-700 font-semibold underline">Try another sentence</a>
"#,
        tokens = tokens_text,
        prediction = prediction_text,
    ));
    html.push_str(&history_section(&payload.history));

    html.push_str(&format!(
        r#"<script>
    const trace = {{
        x: {xs},
        y: {ys},
        z: {zs},
        mode: 'markers+text',
        marker: {{ size: 12, line: {{ color: 'rgba(217, 217, 217, 0.14)', width: 0.5 }}, opacity: 0.8 }},
        text: {labels},
        textposition: 'top center',
        type: 'scatter3d'
    }};
    const layout = {{
        title: '3D Token Plot with Labels',
        autosize: true,
        scene: {{
            xaxis: {{ title: 'Token Index' }},
            yaxis: {{ title: 'Token Length' }},
            zaxis: {{ title: 'Random Z' }}
        }}
    }};
    Plotly.newPlot('plot', [trace], layout);
</script>
"#,
        xs = script_json(&payload.series.xs),
        ys = script_json(&payload.series.ys),
        zs = script_json(&payload.series.zs),
        labels = script_json(&payload.tokens),
    ));
    html.push_str(PAGE_FOOT);
    html
}

/// A page carrying a single user-facing message and a way back to the form.
pub fn render_error_page(message: &str) -> String {
    let mut html = page_head("");
    html.push_str(&format!(
        r#"<div class="bg-white shadow-md rounded-lg p-8 w-full max-w-md error-message">
    <p class="text-red-600 text-center font-semibold">{}</p>
    <a href="/" class="text-blue-500 hover:text-blue-700 font-semibold underline block text-center mt-4">Back</a>
</div>
"#,
        encode_text(message)
    ));
    html.push_str(PAGE_FOOT);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{Prediction, Series};

    fn payload(tokens: &[&str], prediction: Option<Prediction>) -> PlotPayload {
        PlotPayload {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            series: Series {
                xs: (0..tokens.len()).collect(),
                ys: tokens.iter().map(|t| t.len()).collect(),
                zs: vec![1.5; tokens.len()],
            },
            prediction,
            history: vec!["earlier <b>input</b>".to_string()],
        }
    }

    #[test]
    fn test_index_without_history() {
        let html = render_index_page(&[]);
        assert!(html.contains(r#"<form action="/tokenize" method="post""#));
        assert!(html.contains(r#"name="sentence""#));
        assert!(html.contains("No previous inputs yet."));
    }

    #[test]
    fn test_index_lists_history_escaped() {
        let html = render_index_page(&["one".to_string(), "<script>x</script>".to_string()]);
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<li>&lt;script&gt;x&lt;/script&gt;</li>"));
        assert!(!html.contains("No previous inputs yet."));
    }

    #[test]
    fn test_plot_page_embeds_series_and_prediction() {
        let html = render_plot_page(&payload(&["The", "quick"], Some(Prediction(4.0))));
        assert!(html.contains("Tokens: <strong>The, quick</strong>"));
        assert!(html.contains("<strong>4.00</strong> characters"));
        assert!(html.contains("x: [0,1]"));
        assert!(html.contains("y: [3,5]"));
        assert!(html.contains("z: [1.5,1.5]"));
        assert!(html.contains(r#"text: ["The","quick"]"#));
        assert!(html.contains(PLOTLY_JS_URL));
        assert!(html.contains("<li>earlier &lt;b&gt;input&lt;/b&gt;</li>"));
    }

    #[test]
    fn test_plot_page_without_prediction() {
        let html = render_plot_page(&payload(&[], None));
        assert!(html.contains("<strong>n/a</strong>"));
        assert!(html.contains("Tokens: <strong>(none)</strong>"));
        assert!(html.contains("x: []"));
    }

    #[test]
    fn test_script_json_cannot_close_script_tag() {
        assert_eq!(script_json(&vec!["</script>"]), r#"["<\/script>"]"#);
    }

    #[test]
    fn test_script_json_handles_non_finite_jitter() {
        assert_eq!(script_json(&vec![1.0, f64::NAN, f64::INFINITY]), "[1.0,null,null]");
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = render_error_page("bad <input>");
        assert!(html.contains("bad &lt;input&gt;"));
        assert!(html.contains(r#"href="/""#));
    }
}
