//! services/portal/src/web/pages.rs
//!
//! Public marketing pages. Their content is static; only the header changes with
//! the session.

use axum::{extract::State, response::Html, Extension};
use legalai_core::routing::Route;
use legalai_core::session::SessionPresence;
use std::sync::Arc;

use crate::web::{render, state::AppState};

struct PageCopy {
    title: &'static str,
    heading: &'static str,
    lead: &'static str,
    sections: &'static [(&'static str, &'static str)],
}

const HOME: PageCopy = PageCopy {
    title: "Home",
    heading: "Transform Legal Documents into Clear Insights",
    lead: "Upload a contract, lease or agreement and get a plain-language summary, key terms, financial calculations and a risk assessment in minutes.",
    sections: &[
        ("Understand what you sign", "Legal jargon explained in everyday language."),
        ("Spot the red flags", "Unusual clauses and fraud indicators are highlighted for you."),
        ("Respond with confidence", "Answer a few questions and get a drafted reply letter."),
    ],
};

const FEATURES: PageCopy = PageCopy {
    title: "Features",
    heading: "Powerful Features for Legal Document Analysis",
    lead: "Everything you need to understand a legal document before you act on it.",
    sections: &[
        ("Plain-language summaries", "A short overview of what the document says and does."),
        ("Key term explanations", "Definitions for the terms that matter most."),
        ("Financial calculations", "Amounts, rates and fees pulled out and explained."),
        ("Risk assessment", "An overall risk level with factors and recommendations."),
        ("Fraud detection", "Indicators of suspicious or unusual content."),
        ("Reply generation", "Drafted letters built from your answers."),
    ],
};

const PRICING: PageCopy = PageCopy {
    title: "Pricing",
    heading: "Simple, Transparent Pricing",
    lead: "Every plan starts with a 14-day free trial. No credit card required.",
    sections: &[
        ("Starter", "For individuals reviewing the occasional document."),
        ("Professional", "For freelancers and small businesses with regular contracts."),
        ("Enterprise", "For teams that need volume, support and custom integrations."),
    ],
};

const ABOUT: PageCopy = PageCopy {
    title: "About",
    heading: "About LegalAI",
    lead: "Our mission is to democratize legal understanding, so that anyone can read a legal document and know what it means for them.",
    sections: &[
        ("Built for people, not lawyers", "We translate legal language into plain words."),
        ("Not legal advice", "Our analysis helps you ask better questions of a qualified professional."),
    ],
};

const CONTACT: PageCopy = PageCopy {
    title: "Contact",
    heading: "Get in Touch",
    lead: "Questions about LegalAI or your account? We would love to hear from you.",
    sections: &[
        ("Email", "support@legalai.example"),
        ("Business hours", "Monday to Friday, 9am to 5pm."),
    ],
};

const SUPPORT: PageCopy = PageCopy {
    title: "Support",
    heading: "How Can We Help?",
    lead: "Find answers to common questions about uploading and analyzing documents.",
    sections: &[
        ("Which files can I upload?", "PDF, Word (.docx) and plain text files."),
        ("How long does analysis take?", "Most documents are analyzed within a few minutes."),
        ("Is my document private?", "Documents are only visible to your account."),
    ],
};

const USE_CASES: PageCopy = PageCopy {
    title: "Use Cases",
    heading: "Legal Documents Made Understandable",
    lead: "LegalAI helps with the documents people meet in everyday life and business.",
    sections: &[
        ("Rental agreements", "Check deposits, notice periods and renewal terms."),
        ("Employment contracts", "Understand non-compete clauses and termination terms."),
        ("Loan documents", "See the real cost of interest rates and fees."),
        ("Demand letters", "Know what is being asked and draft a reply."),
    ],
};

fn copy_for(route: &Route) -> &'static PageCopy {
    match route {
        Route::Features => &FEATURES,
        Route::Pricing => &PRICING,
        Route::About => &ABOUT,
        Route::Contact => &CONTACT,
        Route::Support => &SUPPORT,
        Route::UseCases => &USE_CASES,
        _ => &HOME,
    }
}

fn render_copy(copy: &PageCopy, signed_in: bool) -> String {
    let mut body = format!(
        r#"<section class="card"><h1>{}</h1><p>{}</p>"#,
        render::escape(copy.heading),
        render::escape(copy.lead)
    );
    let cta = if signed_in {
        r#"<a href="/dashboard">Go to Dashboard</a>"#
    } else {
        r#"<a href="/login?mode=register">Start Free Trial</a>"#
    };
    body.push_str(cta);
    body.push_str("</section>");
    for (title, text) in copy.sections {
        body.push_str(&format!(
            r#"<section class="card"><h2>{}</h2><p>{}</p></section>"#,
            render::escape(title),
            render::escape(text)
        ));
    }
    body
}

/// GET handler shared by all public pages. The route guard has already resolved
/// which page was requested.
pub async fn marketing_page(
    State(state): State<Arc<AppState>>,
    Extension(route): Extension<Route>,
) -> Html<String> {
    let signed_in = state.session.presence().await == SessionPresence::Present;
    let copy = copy_for(&route);
    render::page(copy.title, signed_in, &render_copy(copy, signed_in))
}
