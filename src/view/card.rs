//! One result card: placeholder, finished image, or refine form.
use maud::{html, Markup};

use crate::stylist::{CardPhase, OutfitView};

pub fn render_card(view: &OutfitView) -> Markup {
    let outfit = &view.outfit;
    if outfit.is_loading {
        return html! {
            div.card.loading id={ "card-" (outfit.style.slug()) } data-id=(outfit.id) {
                p { "Designing " (outfit.style.label()) "..." }
            }
        };
    }

    let base = format!("/outfits/{}", outfit.id);
    html! {
        div.card id={ "card-" (outfit.style.slug()) } data-id=(outfit.id) {
            img src=(outfit.image_url) alt={ (outfit.style.label()) " Outfit" };
            div.body {
                h3 { (outfit.style.label()) }
                p.muted { (outfit.description) }
                @match view.phase {
                    CardPhase::Closed => {
                        div.actions {
                            a.button.secondary href={ (base) "/download" } download { "Download" }
                            form method="post" action={ (base) "/editor" } {
                                button type="submit" { "Edit with AI" }
                            }
                        }
                    }
                    CardPhase::Editing => {
                        form method="post" action={ (base) "/edit" } {
                            label for={ "prompt-" (outfit.id) } { "REFINE THIS LOOK" }
                            textarea id={ "prompt-" (outfit.id) } name="prompt" rows="2" autofocus
                                placeholder="e.g. Change shoes to sneakers, add a red scarf..." {}
                            div.actions {
                                button.secondary type="submit" formaction={ (base) "/editor/cancel" } { "Cancel" }
                                button type="submit" { "Generate" }
                            }
                        }
                    }
                    CardPhase::Submitting => {
                        p.muted { "Refining..." }
                    }
                }
            }
        }
    }
}
