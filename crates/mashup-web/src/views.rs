//! HTML pages

use maud::{html, Markup, DOCTYPE};
use mashup_core::validate::{WebRequest, WebSubmission, MIN_DURATION_SECS, WEB_MIN_ITEMS};

use crate::job::JobOutcome;

const STYLE: &str = "
body { font-family: system-ui, sans-serif; max-width: 36rem; margin: 3rem auto; padding: 0 1rem; }
label { display: block; margin-top: 1rem; font-weight: 600; }
input { width: 100%; padding: .5rem; box-sizing: border-box; }
button { margin-top: 1.5rem; padding: .6rem 1.2rem; }
.error { color: #a40000; }
.ok { color: #006400; }
";

fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (STYLE) }
            }
            body {
                h1 { "Mashup Generator" }
                (body)
            }
        }
    }
}

/// The input form, with any rejection reasons and the previous values.
pub fn index(errors: &[String], form: &WebSubmission) -> Markup {
    page(
        "Mashup Generator",
        html! {
            @if !errors.is_empty() {
                ul.error {
                    @for error in errors {
                        li { (error) }
                    }
                }
            }
            form method="post" action="/mashup" {
                label for="singer_name" { "Singer name" }
                input id="singer_name" type="text" name="singer_name" value=(form.singer_name) required;

                label for="num_videos" { "Number of videos (at least " (WEB_MIN_ITEMS) ")" }
                input id="num_videos" type="number" name="num_videos" value=(form.num_videos) min=(WEB_MIN_ITEMS) required;

                label for="duration" { "Duration of each clip in seconds (at least " (MIN_DURATION_SECS) ")" }
                input id="duration" type="number" name="duration" value=(form.duration) min=(MIN_DURATION_SECS) required;

                label for="email" { "Email" }
                input id="email" type="email" name="email" value=(form.email) required;

                button type="submit" { "Create mashup" }
            }
        },
    )
}

/// Success or failure page for a finished job.
pub fn result(request: &WebRequest, outcome: &JobOutcome) -> Markup {
    let body = match &outcome.result {
        Err(error) => html! {
            h2.error { "Mashup failed" }
            p.error { (error) }
            p { a href="/" { "Try again" } }
        },
        Ok(artifacts) => html! {
            h2.ok { "Your mashup is ready" }
            dl {
                dt { "Singer" } dd { (request.params.artist) }
                dt { "Videos" } dd { (request.params.item_count) }
                dt { "Seconds per clip" } dd { (request.params.duration_secs) }
                dt { "Clips merged" } dd { (artifacts.report.merge.segments) }
                dt { "Email" } dd { (request.email) }
            }
            @if artifacts.delivery.is_sent() {
                p.ok { "The zip was emailed to " (request.email) "." }
            } @else {
                p.error {
                    "Email not sent"
                    @if let Some(reason) = artifacts.delivery.reason() {
                        ": " (reason)
                    }
                }
            }
            audio controls src=(artifacts.audio_url()) {}
            ul {
                li { a href=(artifacts.audio_url()) download { "Download MP3" } }
                li { a href=(artifacts.zip_url()) download { "Download ZIP" } }
            }
            p { a href="/" { "Make another" } }
        },
    };

    page("Mashup result", body)
}
