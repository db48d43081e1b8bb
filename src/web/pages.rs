//! Server-rendered HTML for the composer and presentation screens.
//!
//! Markup only; every decision about what to show is made by the state
//! types before a page is rendered.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use uuid::Uuid;

use crate::celebration::Celebration;
use crate::composer::COPY_FEEDBACK;
use crate::presentation::{Offset, PresentationView};

const PAGE_CSS: &str = r#"
body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center;
       font-family: system-ui, sans-serif; background: linear-gradient(135deg, #ffe4ec, #fff0f5); overflow: hidden; }
.card { background: #fff; border-radius: 2rem; padding: 2.5rem; max-width: 36rem; width: 100%;
        text-align: center; box-shadow: 0 20px 60px rgba(236, 72, 153, .25); }
h1 { color: #ec4899; } h2 { color: #e11d48; font-size: 2.5rem; }
input { width: 100%; box-sizing: border-box; padding: 1rem 1.25rem; border-radius: 999px;
        border: 2px solid #fecdd3; font-size: 1rem; margin-bottom: .75rem; }
button, .button { border: 0; border-radius: 999px; padding: 1rem 2rem; font-weight: 700; font-size: 1.1rem;
                  background: linear-gradient(135deg, #ec4899, #f43f5e); color: #fff; cursor: pointer;
                  text-decoration: none; display: inline-block; }
.muted { color: #9f7a88; font-size: .9rem; }
.notice { color: #e11d48; }
.choices { display: flex; gap: 2rem; justify-content: center; align-items: center; min-height: 120px; flex-wrap: wrap; }
.no { background: #f1e4e8; color: #6b4b57; transition: transform .3s; }
.player { aspect-ratio: 16 / 9; width: 100%; border: 0; border-radius: 1rem; }
"#;

/// Clipboard write plus the transient "Copied!" label.
fn copy_script() -> String {
    format!(
        r#"document.getElementById("copy").addEventListener("click", function () {{
  var button = this;
  navigator.clipboard.writeText(document.getElementById("link").value).then(function () {{
    button.textContent = "Copied!";
    setTimeout(function () {{ button.textContent = "Copy Link"; }}, {ms});
  }}, function () {{}});
}});"#,
        ms = COPY_FEEDBACK.as_millis()
    )
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main class="card" { (body) }
            }
        }
    }
}

/// Composer form: name and contact on one screen.
pub fn composer(name: &str, contact: &str, notice: Option<&str>) -> Markup {
    layout(
        "Be My Valentine?",
        html! {
            h1 { "Be My Valentine?" }
            p class="muted" { "Create a special message for someone you love 💕" }
            @if let Some(notice) = notice {
                p class="notice" { (notice) }
            }
            form method="post" action="/compose" {
                input type="text" name="name" value=(name)
                    placeholder="Enter their name... 💌" autocomplete="off";
                input type="tel" name="contact" value=(contact)
                    placeholder="Your WhatsApp number (e.g., +2348012345678)";
                p class="muted" {
                    strong { "Important:" }
                    " Include your country code so their sweet \"yes\" can find its way back to you. 💞"
                }
                button type="submit" { "Create My Valentine" }
            }
            p class="muted" { "Share the link and watch the magic happen ✨💞" }
        },
    )
}

/// Link-ready screen with copy and share-to-recipient actions.
pub fn link_ready(link: &str) -> Markup {
    layout(
        "Your Valentine link",
        html! {
            h1 { "Your link is ready 💘" }
            p class="muted" { "Share this link" }
            input type="text" id="link" readonly value=(link);
            button type="button" id="copy" { "Copy Link" }
            form method="post" action="/share" {
                input type="hidden" name="link" value=(link);
                input type="tel" name="recipient"
                    placeholder="Recipient WhatsApp (e.g., +2348012345678)";
                button type="submit" { "Send Link" }
            }
            p { a class="muted" href="/" { "Make another" } }
            script { (PreEscaped(copy_script())) }
        },
    )
}

/// Question screen with the escalating Yes/No controls.
pub fn question(session: Uuid, view: &PresentationView, offset: Offset) -> Markup {
    let accept_style = format!(
        "transform: scale({:.2}); font-size: {}px",
        view.accept_scale, view.accept_font_px
    );
    let decline_style = format!(
        "transform: translate({:.0}px, {:.0}px) scale({:.2})",
        offset.x, offset.y, view.decline_scale
    );
    layout(
        "Will You Be My Valentine?",
        html! {
            h1 { (view.greeting) " 💗" }
            p { "I have a very important question... 🌹" }
            h2 { "Will You Be My Valentine?" }
            div class="choices" {
                form method="post" action=(format!("/valentine/{session}/accept")) {
                    button type="submit" style=(accept_style) { "💗 Yes! 💗" }
                }
                form method="post" action=(format!("/valentine/{session}/decline")) {
                    button type="submit" class="no" style=(decline_style) { (view.decline_label) }
                }
            }
            @if let Some(encouragement) = view.encouragement {
                p class="muted" { (encouragement) }
            }
        },
    )
}

/// Celebration screen.
pub fn celebration(celebration: &Celebration) -> Markup {
    layout(
        "Yay! 💕",
        html! {
            h1 { (celebration.headline) }
            p { "💗 💗 💗 💗 💗" }
            p { (celebration.message) }
            p class="muted" { "🎵 Our love playlist is playing... 💞" }
            iframe class="player" src=(celebration.embed_url)
                title=(format!("Love Song - {}", celebration.song.title))
                allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                allowfullscreen {}
            p class="muted" { "If it doesn't start, tap play. 🎶" }
            @if let Some(uri) = &celebration.reply_uri {
                p {
                    a class="button" href=(uri) target="_blank" rel="noreferrer" {
                        "Send Your Response 💌"
                    }
                }
            }
            p { (celebration.closing) }
        },
    )
}

/// Shown when a presentation session has expired or never existed.
pub fn not_found() -> Markup {
    layout(
        "Not found",
        html! {
            h1 { "This page has wandered off 💔" }
            p { a class="button" href="/" { "Make your own" } }
        },
    )
}
