//! Result screen: one card per paragraph, or the error message

use dental_core::format::{inline_spans, Span};
use yew::prelude::*;

/// Rendered shape of one paragraph
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(String),
    List(Vec<String>),
}

/// Group a paragraph's lines: consecutive `- ` lines form one list
pub fn blocks(paragraph: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    for line in paragraph.lines() {
        let Some(item) = line.strip_prefix("- ") else {
            blocks.push(Block::Text(line.to_string()));
            continue;
        };
        if let Some(Block::List(items)) = blocks.last_mut() {
            items.push(item.to_string());
        } else {
            blocks.push(Block::List(vec![item.to_string()]));
        }
    }
    blocks
}

fn inline(text: &str) -> Html {
    inline_spans(text)
        .into_iter()
        .map(|span| match span {
            Span::Plain(text) => html! { { text } },
            Span::Strong(text) => html! { <strong>{ text }</strong> },
        })
        .collect()
}

fn render_block(block: &Block) -> Html {
    match block {
        Block::Text(text) => html! { <p>{ inline(text) }</p> },
        Block::List(items) => html! {
            <ul>
                { for items.iter().map(|item| html! { <li>{ inline(item) }</li> }) }
            </ul>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultProps {
    pub paragraphs: Vec<String>,
    #[prop_or_default]
    pub error: Option<String>,
    pub on_reset: Callback<()>,
}

#[function_component(ResultView)]
pub fn result_view(props: &ResultProps) -> Html {
    html! {
        <div class="result-card" data-testid="result">
            <h2>{ "Hasil Analisis Gigi" }</h2>
            if let Some(error) = &props.error {
                <p class="result-error" data-testid="result-error">{ error }</p>
            } else {
                { for props.paragraphs.iter().map(|paragraph| html! {
                    <div class="result-section">
                        { for blocks(paragraph).iter().map(render_block) }
                    </div>
                })}
            }
            <button
                class="primary"
                onclick={props.on_reset.reform(|_| ())}
                data-testid="reset-button"
            >
                { "Analisis Lagi" }
            </button>
        </div>
    }
}
