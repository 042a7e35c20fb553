//! Server-rendered HTML for the four views

use crate::dataset::schema::{BREASTFEEDING_CLASSES, FEATURE_COLUMNS, SEX_CLASSES};
use crate::dataset::summary::format_number;
use crate::dataset::{ColumnSummary, TablePreview};
use crate::inference::StuntingPrediction;
use crate::training::{ModelKind, ModelScore};
use std::fmt::Write;

const BANNER_URL: &str = "https://i.imgur.com/cab82rH.png";
const ILLUSTRATION_URL: &str =
    "https://rsudblora.blorakab.go.id/wp-content/uploads/2022/12/apa-itu-stunting-1024x576.jpeg";

pub const INCOMPLETE_MESSAGE: &str = "Lengkapi data di atas.";
pub const STUNTED_MESSAGE: &str = "Anak mengalami stunting.";
pub const NOT_STUNTED_MESSAGE: &str = "Anak tidak mengalami stunting.";

/// Top-level navigation entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Predict,
    Info,
    Data,
}

impl View {
    const ALL: [View; 4] = [View::Home, View::Predict, View::Info, View::Data];

    fn label(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Predict => "Predict",
            View::Info => "Info",
            View::Data => "Tentang Data",
        }
    }

    fn href(&self) -> &'static str {
        match self {
            View::Home => "/",
            View::Predict => "/predict",
            View::Info => "/info",
            View::Data => "/data",
        }
    }
}

/// Sub-views of Tentang Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    Info,
    Pairplot,
    Histogram,
}

impl Analysis {
    pub const ALL: [Analysis; 3] = [Analysis::Info, Analysis::Pairplot, Analysis::Histogram];

    pub fn key(&self) -> &'static str {
        match self {
            Analysis::Info => "info",
            Analysis::Pairplot => "pairplot",
            Analysis::Histogram => "histogram",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Analysis::Info => "Informasi data",
            Analysis::Pairplot => "Grafik Coxplot",
            Analysis::Histogram => "Histogram",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key.trim())
    }
}

/// Values shown in the prediction form, as submitted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    pub sex: String,
    pub age: String,
    pub birth_weight: String,
    pub birth_length: String,
    pub body_weight: String,
    pub body_length: String,
    pub breastfeeding: String,
}

/// What the Predict view shows under the form
#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    Incomplete,
    Invalid(String),
    Prediction(StuntingPrediction),
}

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn layout(active: View, body: &str) -> String {
    let mut nav = String::new();
    for view in View::ALL {
        let class = if view == active { " class=\"active\"" } else { "" };
        let _ = write!(
            nav,
            "<a href=\"{}\"{}>{}</a>",
            view.href(),
            class,
            view.label()
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Prediksi Stunting - {title}</title>
<style>
body{{font-family:sans-serif;margin:0 auto;max-width:1100px;padding:1rem;color:#262730}}
nav{{display:flex;gap:.5rem;margin:1rem 0;padding:.5rem;background:#f0f2f6;border-radius:.5rem}}
nav a{{padding:.5rem 1rem;border-radius:.4rem;text-decoration:none;color:#262730}}
nav a.active{{background:#ff4b4b;color:#fff}}
table{{border-collapse:collapse;margin:.5rem 0}}
th,td{{border:1px solid #ddd;padding:.3rem .6rem;text-align:right}}
th{{background:#f0f2f6}}
form.grid{{display:grid;grid-template-columns:12rem 14rem;gap:.5rem}}
.warning{{color:#9c6500;background:#fff8e1;padding:.5rem}}
.result{{background:#e8f5e9;padding:.5rem}}
</style>
</head>
<body>
<img src="{banner}" width="500" alt="Stunting">
<nav>{nav}</nav>
<main>
{body}
</main>
</body>
</html>"#,
        title = active.label(),
        banner = BANNER_URL,
        nav = nav,
        body = body,
    )
}

/// Home: app description and the model leaderboard
pub fn home(scores: &[ModelScore], selected: ModelKind) -> String {
    let mut body = String::from(
        "<h2>Tentang Aplikasi</h2>\n\
         <p>Aplikasi ini memprediksi stunting pada anak berdasarkan berbagai faktor.</p>\n\
         <p>Aplikasi ini menggunakan algoritma pembelajaran mesin untuk memprediksi kemungkinan terjadinya stunting.</p>\n",
    );

    body.push_str(
        "<h3>Model</h3>\n<table id=\"models\"><tr><th>Model</th><th>Accuracy</th>\
         <th>Precision</th><th>Recall</th><th>F1</th><th>Training time (s)</th><th></th></tr>\n",
    );
    for score in scores {
        let m = &score.metrics;
        let marker = if score.kind == selected { "selected" } else { "" };
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td><td>{:.3}</td><td>{}</td></tr>",
            score.kind.display_name(),
            m.accuracy,
            m.precision,
            m.recall,
            m.f1_score,
            m.training_time_secs,
            marker
        );
    }
    body.push_str("</table>\n");

    let _ = write!(
        body,
        "<figure><img src=\"{}\" style=\"width:100%\" alt=\"Apa itu stunting\">\
         <figcaption>Apa itu stunting?</figcaption></figure>",
        ILLUSTRATION_URL
    );

    layout(View::Home, &body)
}

fn select(name: &str, options: &[&str], current: &str) -> String {
    let mut html = format!("<select name=\"{}\" id=\"{}\">", name, name);
    for option in options {
        let selected = if option.eq_ignore_ascii_case(current.trim()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape(option),
            selected
        );
    }
    html.push_str("</select>");
    html
}

fn number_input(name: &str, label: &str, value: &str, step: &str) -> String {
    format!(
        "<label for=\"{name}\">{label}</label>\
         <input type=\"number\" name=\"{name}\" id=\"{name}\" min=\"0\" max=\"100\" step=\"{step}\" value=\"{value}\">",
        name = name,
        label = label,
        step = step,
        value = escape(value),
    )
}

/// Predict: the input form and, after a submission, its outcome
pub fn predict(values: &FormValues, outcome: Option<&PredictOutcome>) -> String {
    let or_zero = |v: &str, zero: &'static str| -> String {
        if v.trim().is_empty() {
            zero.to_string()
        } else {
            v.to_string()
        }
    };

    let mut body = String::from("<h2>Input Data</h2>\n<form class=\"grid\" method=\"post\" action=\"/predict\">\n");
    let _ = write!(
        body,
        "<label for=\"sex\">Sex</label>{}",
        select("sex", &SEX_CLASSES, &values.sex)
    );
    body.push_str(&number_input("age", "Age", &or_zero(&values.age, "0"), "1"));
    body.push_str(&number_input(
        "birth_weight",
        "Birth Weight",
        &or_zero(&values.birth_weight, "0.0"),
        "0.1",
    ));
    body.push_str(&number_input(
        "birth_length",
        "Birth Length",
        &or_zero(&values.birth_length, "0.0"),
        "0.1",
    ));
    body.push_str(&number_input(
        "body_weight",
        "Body Weight",
        &or_zero(&values.body_weight, "0.0"),
        "0.1",
    ));
    body.push_str(&number_input(
        "body_length",
        "Body Length",
        &or_zero(&values.body_length, "0.0"),
        "0.1",
    ));
    let _ = write!(
        body,
        "<label for=\"breastfeeding\">ASI Eksklusif</label>{}",
        select("breastfeeding", &BREASTFEEDING_CLASSES, &values.breastfeeding)
    );
    body.push_str("\n<button type=\"submit\">Predict</button>\n</form>\n");

    match outcome {
        None => {}
        Some(PredictOutcome::Incomplete) => {
            let _ = write!(body, "<p class=\"warning\">{}</p>", INCOMPLETE_MESSAGE);
        }
        Some(PredictOutcome::Invalid(message)) => {
            let _ = write!(body, "<p class=\"warning\">{}</p>", escape(message));
        }
        Some(PredictOutcome::Prediction(p)) => {
            let verdict = if p.is_stunting {
                STUNTED_MESSAGE
            } else {
                NOT_STUNTED_MESSAGE
            };
            let _ = write!(
                body,
                "<div class=\"result\"><p>{}</p>\
                 <p>Probability of stunting: {}</p>\
                 <p>Probability of not stunting: {}</p></div>",
                verdict, p.probability_stunting, p.probability_not_stunting
            );
        }
    }

    layout(View::Predict, &body)
}

/// Info: stunting FAQ
pub fn info() -> String {
    let faq: [(&str, &[&str]); 4] = [
        (
            "Apa itu stunting?",
            &[
                "Stunting adalah kondisi di mana tinggi badan seorang anak lebih rendah dari tinggi yang diharapkan untuk usianya.",
                "Ini merupakan indikator dari kekurangan gizi kronis.",
            ],
        ),
        (
            "Mengapa stunting menjadi masalah?",
            &[
                "Stunting dapat memiliki dampak negatif pada perkembangan fisik dan kognitif seorang anak.",
                "Hal ini juga dapat menyebabkan performa buruk di sekolah dan pendapatan yang lebih rendah di masa dewasa.",
            ],
        ),
        (
            "Bagaimana stunting diukur?",
            &[
                "Stunting diukur sebagai Z-score tinggi-untuk-usia, yang merupakan ukuran standar tinggi badan seorang anak relatif terhadap usia dan jenis kelamin mereka.",
                "Anak-anak dengan Z-score di bawah -2 dianggap mengalami stunting.",
            ],
        ),
        (
            "Bagaimana stunting dapat dicegah?",
            &[
                "Stunting dapat dicegah melalui berbagai intervensi, seperti meningkatkan gizi selama kehamilan dan masa kanak-kanak, mempromosikan pemberian ASI, dan menyediakan akses ke air bersih dan sanitasi.",
            ],
        ),
    ];

    let mut body = String::from("<h2>FAQ</h2>\n");
    for (question, answers) in faq {
        let _ = writeln!(body, "<h4>{}</h4>", question);
        for answer in answers {
            let _ = writeln!(body, "<p>{}</p>", answer);
        }
    }
    layout(View::Info, &body)
}

/// Content of one Tentang Data sub-view
#[derive(Debug, Clone)]
pub enum DataSection<'a> {
    Info {
        preview: &'a TablePreview,
        summaries: &'a [ColumnSummary],
        total_rows: usize,
    },
    Pairplot {
        selected: &'a [String],
        svg: Option<&'a str>,
    },
    Histogram {
        feature: &'a str,
        svg: &'a str,
    },
}

/// Tentang Data: sub-view selector plus the chosen section
pub fn data(section: &DataSection<'_>) -> String {
    let current = match section {
        DataSection::Info { .. } => Analysis::Info,
        DataSection::Pairplot { .. } => Analysis::Pairplot,
        DataSection::Histogram { .. } => Analysis::Histogram,
    };

    let mut body = String::from(
        "<h2>Data Overview</h2>\n\
         <p>Dataset ini berisi informasi tentang status stunting anak berdasarkan berbagai faktor.</p>\n\
         <form method=\"get\" action=\"/data\"><label for=\"analysis\">Select Analysis Option</label> \
         <select name=\"analysis\" id=\"analysis\">",
    );
    for analysis in Analysis::ALL {
        let selected = if analysis == current { " selected" } else { "" };
        let _ = write!(
            body,
            "<option value=\"{}\"{}>{}</option>",
            analysis.key(),
            selected,
            analysis.label()
        );
    }
    body.push_str("</select> <button type=\"submit\">Show</button></form>\n");

    match section {
        DataSection::Info {
            preview,
            summaries,
            total_rows,
        } => {
            body.push_str("<h3>Yuk kita Liat datanya</h3>\n");
            body.push_str(&preview_table(preview));
            body.push_str("<h3>Serba Serbi Data</h3>\n");
            body.push_str(&describe_table(summaries));
            let _ = writeln!(body, "<p>Total number of data points: {}</p>", total_rows);
            body.push_str("<p>Columns:</p>\n<ul>");
            for column in FEATURE_COLUMNS {
                let _ = write!(body, "<li>{}</li>", escape(column));
            }
            body.push_str("</ul>\n");
        }
        DataSection::Pairplot { selected, svg } => {
            body.push_str(
                "<h3>Coxplot Graph</h3>\n\
                 <p>Coxplot showing relationship between multiple variables</p>\n\
                 <form method=\"get\" action=\"/data\">\
                 <input type=\"hidden\" name=\"analysis\" value=\"pairplot\">\
                 <p>Select features for Coxplot:</p>",
            );
            for column in FEATURE_COLUMNS {
                let checked = if selected.iter().any(|s| s == column) {
                    " checked"
                } else {
                    ""
                };
                let _ = write!(
                    body,
                    "<label><input type=\"checkbox\" name=\"features\" value=\"{0}\"{1}> {0}</label> ",
                    escape(column),
                    checked
                );
            }
            body.push_str("<button type=\"submit\">Plot</button></form>\n");
            if let Some(svg) = svg {
                let _ = write!(body, "<div class=\"plot\">{}</div>", svg);
            }
        }
        DataSection::Histogram { feature, svg } => {
            body.push_str(
                "<h3>Histogram Graph</h3>\n\
                 <p>The following histogram shows the distribution of a selected feature:</p>\n\
                 <form method=\"get\" action=\"/data\">\
                 <input type=\"hidden\" name=\"analysis\" value=\"histogram\">\
                 <label for=\"feature\">Select a feature for histogram:</label> ",
            );
            body.push_str(&select("feature", &FEATURE_COLUMNS, feature));
            body.push_str(" <button type=\"submit\">Plot</button></form>\n");
            let _ = write!(body, "<div class=\"plot\">{}</div>", svg);
        }
    }

    layout(View::Data, &body)
}

fn preview_table(preview: &TablePreview) -> String {
    let mut html = String::from("<table id=\"preview\"><tr><th></th>");
    for column in &preview.columns {
        let _ = write!(html, "<th>{}</th>", escape(column));
    }
    html.push_str("</tr>\n");
    for (i, row) in preview.rows.iter().enumerate() {
        let _ = write!(html, "<tr><th>{}</th>", i);
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

fn describe_table(summaries: &[ColumnSummary]) -> String {
    let mut html = String::from("<table id=\"describe\"><tr><th></th>");
    for summary in summaries {
        let _ = write!(html, "<th>{}</th>", escape(&summary.name));
    }
    html.push_str("</tr>\n");

    let rows: Vec<_> = summaries.iter().map(|s| s.rows()).collect();
    if let Some(first) = rows.first() {
        for (i, (label, _)) in first.iter().enumerate() {
            let _ = write!(html, "<tr><th>{}</th>", label);
            for stats in &rows {
                let cell = stats[i].1.map(format_number).unwrap_or_default();
                let _ = write!(html, "<td>{}</td>", cell);
            }
            html.push_str("</tr>\n");
        }
    }
    html.push_str("</table>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_analysis_keys() {
        assert_eq!(Analysis::from_key("pairplot"), Some(Analysis::Pairplot));
        assert_eq!(Analysis::from_key(" histogram "), Some(Analysis::Histogram));
        assert_eq!(Analysis::from_key("boxplot"), None);
    }

    #[test]
    fn test_predict_echoes_values() {
        let values = FormValues {
            sex: "Female".to_string(),
            age: "24".to_string(),
            birth_weight: "3.0".to_string(),
            ..Default::default()
        };
        let html = predict(&values, Some(&PredictOutcome::Incomplete));
        assert!(html.contains("<option value=\"Female\" selected>"));
        assert!(html.contains("value=\"24\""));
        assert!(html.contains("value=\"3.0\""));
        assert!(html.contains(INCOMPLETE_MESSAGE));
    }

    #[test]
    fn test_empty_pairplot_has_no_plot() {
        let html = data(&DataSection::Pairplot {
            selected: &[],
            svg: None,
        });
        assert!(!html.contains("class=\"plot\""));
        assert!(html.contains("Select features for Coxplot:"));
    }

    #[test]
    fn test_nav_marks_active_view() {
        let html = info();
        assert!(html.contains("<a href=\"/info\" class=\"active\">Info</a>"));
        assert!(html.contains("Apa itu stunting?"));
    }
}
