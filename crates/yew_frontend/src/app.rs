//! Main application component

use crate::api;
use crate::components::result::ResultView;
use crate::components::upload::UploadComponent;
use dental_core::{AnalysisState, SelectedImage, Session};
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

const CAPTURE_TIPS: [&str; 3] = [
    "Pastikan pencahayaan yang cukup",
    "Fokuskan pada area gigi yang bermasalah",
    "Gunakan flash jika pencahayaan kurang terang",
];

/// Label of the submit button for the current session
pub fn submit_label(session: &Session) -> &'static str {
    if session.is_analyzing() {
        "Menganalisa gigi Anda..."
    } else {
        "Mulai Analisis"
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let session = use_state(Session::new);

    let on_select = {
        let session = session.clone();
        Callback::from(move |image: SelectedImage| {
            let mut next = (*session).clone();
            if next.select_image(image) {
                session.set(next);
            }
        })
    };

    let on_complaint = {
        let session = session.clone();
        Callback::from(move |e: InputEvent| {
            let text = e.target_unchecked_into::<HtmlTextAreaElement>().value();
            let mut next = (*session).clone();
            if next.set_complaint(text) {
                session.set(next);
            }
        })
    };

    let on_submit = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*session).clone();
            let request = match next.begin() {
                Ok(request) => request,
                Err(err) => {
                    gloo::console::warn!(format!("cannot start analysis: {err}"));
                    return;
                }
            };
            session.set(next.clone());

            let session = session.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = api::analyze(&request).await;
                if let Err(failure) = &outcome {
                    gloo::console::error!(format!("Error menganalisis gambar: {}", failure.cause()));
                }
                next.finish(outcome);
                session.set(next);
            });
        })
    };

    let on_reset = {
        let session = session.clone();
        Callback::from(move |_: ()| {
            let mut next = (*session).clone();
            if next.reset() {
                session.set(next);
            }
        })
    };

    match session.state() {
        AnalysisState::Done(result) => html! {
            <div class="app">
                <ResultView paragraphs={result.paragraphs()} on_reset={on_reset} />
            </div>
        },
        AnalysisState::Failed(message) => html! {
            <div class="app">
                <ResultView paragraphs={Vec::<String>::new()} error={Some(message.clone())} on_reset={on_reset} />
            </div>
        },
        AnalysisState::Idle | AnalysisState::Analyzing => html! {
            <div class="app">
                <main class="app-main">
                    <h1>{ "Analisa Kesehatan Gigi" }</h1>
                    <UploadComponent
                        image={session.image().cloned()}
                        on_select={on_select}
                        disabled={session.is_analyzing()}
                    />
                    <div class="capture-tips">
                        <h3>{ "Panduan Pengambilan Gambar:" }</h3>
                        <ul>
                            { for CAPTURE_TIPS.iter().map(|tip| html! { <li>{ *tip }</li> }) }
                        </ul>
                    </div>
                    <div class="complaint">
                        <label for="dental-complaint">{ "Keluhan Gigi (Opsional)" }</label>
                        <textarea
                            id="dental-complaint"
                            rows="4"
                            placeholder="Ceritakan keluhan gigi Anda di sini (opsional)..."
                            value={session.complaint().to_string()}
                            oninput={on_complaint}
                            disabled={session.is_analyzing()}
                        />
                    </div>
                    <button
                        class="primary"
                        onclick={on_submit}
                        disabled={!session.can_submit()}
                        data-testid="submit-button"
                    >
                        { submit_label(&session) }
                    </button>
                </main>
                if session.is_analyzing() {
                    <div class="overlay" data-testid="analyzing-overlay">
                        <div class="overlay-card">
                            <p>{ "Menganalisa gigi Anda..." }</p>
                            <div class="spinner"></div>
                        </div>
                    </div>
                }
            </div>
        },
    }
}
