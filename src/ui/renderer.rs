// Formatting utilities for the dashboard widgets

use crate::reconciler::Prediction;

/// Format a monetary amount, "unknown" when absent
pub fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(a) => format!("${:.2}", a),
        None => "unknown".to_string(),
    }
}

/// Format the feed's relative time offset as h:mm:ss, "unknown" when absent
pub fn format_time_offset(time: Option<f64>) -> String {
    match time {
        Some(t) if t >= 0.0 => {
            let secs = t as u64;
            format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
        _ => "unknown".to_string(),
    }
}

/// Render the three model votes as a compact L/R/X triple
pub fn format_votes(prediction: Option<&Prediction>) -> String {
    match prediction {
        Some(p) => format!(
            "L:{} R:{} X:{}",
            vote_glyph(p.logistic),
            vote_glyph(p.random_forest),
            vote_glyph(p.xgboost)
        ),
        None => "no prediction".to_string(),
    }
}

fn vote_glyph(vote: Option<u8>) -> char {
    match vote {
        Some(1) => '1',
        Some(_) => '0',
        None => '-',
    }
}

/// First characters of an identifier for narrow table columns
pub fn short_id(id: Option<&str>) -> String {
    match id {
        Some(id) if id.chars().count() > 12 => {
            let head: String = id.chars().take(11).collect();
            format!("{}…", head)
        }
        Some(id) => id.to_string(),
        None => "unknown".to_string(),
    }
}
