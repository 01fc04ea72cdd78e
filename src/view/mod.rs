//! Server-rendered page reflecting the current session.
//!
//! The page has no client-side logic: every control is a form posting back to
//! the server, and while a run or a refinement is in flight the document
//! refreshes itself every two seconds.
pub mod card;

use maud::{html, Markup, DOCTYPE};

use crate::stylist::SessionView;

pub use card::render_card;

const CSS: &str = include_str!("../../static/style.css");

fn base_document(title: &str, refresh: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if refresh {
                    meta http-equiv="refresh" content="2";
                }
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

fn start_button(view: &SessionView) -> Markup {
    html! {
        @if view.can_start {
            form method="post" action="/generate" {
                button type="submit" { "Create My Outfits" }
            }
        } @else if view.generating {
            button type="button" disabled { "Analyzing Wardrobe..." }
        }
    }
}

fn upload_zone(view: &SessionView) -> Markup {
    html! {
        form.upload-zone method="post" action="/upload" enctype="multipart/form-data" {
            @if let Some(upload) = &view.upload {
                img src=(upload.preview_url) alt="Selected Item";
                p.muted { (upload.file_name) }
                @if !view.generating {
                    input type="file" name="file" accept="image/*" required;
                    button.secondary type="submit" { "Change Item" }
                }
            } @else {
                h3 { "Upload your item" }
                p.muted { "Choose a photo of clothing (skirt, shirt, etc.)" }
                input type="file" name="file" accept="image/*" required;
                button type="submit" { "Upload" }
            }
        }
    }
}

fn notices(view: &SessionView) -> Markup {
    html! {
        @if let Some(error) = &view.error {
            div.notice.error { (error) }
        }
        @if let Some(alert) = &view.alert {
            form.notice.alert method="post" action="/alert/dismiss" {
                p { (alert) }
                button type="submit" { "OK" }
            }
        }
    }
}

pub fn render_page(view: &SessionView) -> Markup {
    let has_results = !view.outfits.is_empty();
    let main_class = (!has_results).then_some("empty");
    let content = html! {
        header.site-header {
            div.brand {
                span.logo { "V" }
                "Virtual Stylist"
            }
        }
        main class=[main_class] {
            section.item {
                @if has_results {
                    h3.muted { "Your Item" }
                } @else {
                    h2 { "What should I wear?" }
                    p.muted {
                        "Upload that one item you love but struggle to match. "
                        "The stylist will create casual, business, and night-out looks for you."
                    }
                }
                (upload_zone(view))
                (start_button(view))
                (notices(view))
            }
            @if has_results {
                section.results {
                    h2 { "Your Wardrobe Options" }
                    p.muted { "Here are the ways to style your item." }
                    div.grid {
                        @for outfit in &view.outfits {
                            (render_card(outfit))
                        }
                    }
                }
            }
        }
    };
    base_document("Virtual Stylist", view.has_work_in_flight(), content)
}
