//! Photo picker with preview

use base64::{engine::general_purpose, Engine as _};
use dental_core::SelectedImage;
use gloo::file::callbacks::FileReader;
use gloo::file::File;
use web_sys::{Event, HtmlInputElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct UploadProps {
    /// Currently selected photo, if any
    pub image: Option<SelectedImage>,
    pub on_select: Callback<SelectedImage>,
    #[prop_or_default]
    pub disabled: bool,
}

/// `data:` URL for previewing the selected photo
pub fn preview_url(image: &SelectedImage) -> String {
    format!(
        "data:{};base64,{}",
        image.mime_type,
        general_purpose::STANDARD.encode(&image.bytes)
    )
}

#[function_component(UploadComponent)]
pub fn upload_component(props: &UploadProps) -> Html {
    let input_ref = use_node_ref();
    // The read is cancelled if its FileReader is dropped
    let reader = use_mut_ref(|| None::<FileReader>);

    let on_file_change = {
        let reader = reader.clone();
        let on_select = props.on_select.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };

            let file = File::from(file);
            let name = file.name();
            let mime_type = file.raw_mime_type();
            let on_select = on_select.clone();
            let task = gloo::file::callbacks::read_as_bytes(&file, move |result| match result {
                Ok(bytes) => on_select.emit(SelectedImage {
                    name,
                    mime_type,
                    bytes,
                }),
                Err(err) => gloo::console::error!(format!("failed to read {name}: {err}")),
            });
            *reader.borrow_mut() = Some(task);
        })
    };

    let open_picker = {
        let input_ref = input_ref.clone();
        let disabled = props.disabled;
        Callback::from(move |_: MouseEvent| {
            if disabled {
                return;
            }
            if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    html! {
        <div class="upload-component">
            <label class="upload-label">{ "Unggah Gambar Gigi" }</label>
            <div class="upload-drop" onclick={open_picker} data-testid="upload-area">
                if let Some(image) = &props.image {
                    <img src={preview_url(image)} alt="Uploaded tooth" class="upload-preview" />
                } else {
                    <span class="upload-hint">{ "Klik untuk unggah gambar" }</span>
                }
            </div>
            <input
                ref={input_ref}
                type="file"
                accept="image/*"
                class="hidden"
                disabled={props.disabled}
                onchange={on_file_change}
                data-testid="file-input"
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_url() {
        let image = SelectedImage {
            name: "gigi.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8, 0xff],
        };
        assert_eq!(preview_url(&image), "data:image/jpeg;base64,/9j/");
    }
}
