use std::cell::RefCell;

use leptos::prelude::*;

use super::markup;
use crate::config::StorageKeys;
use crate::store;

/// Editable document with a live preview of its markup.
#[component]
pub fn DocumentPanel(
	/// Where the document text is persisted.
	#[prop(default = StorageKeys::default())]
	keys: StorageKeys,
) -> impl IntoView {
	let backend = RefCell::new(store::open_browser_store());
	let text = RwSignal::new(store::load_document(backend.borrow().as_ref(), &keys));
	let preview = Memo::new(move |_| text.with(|t| markup::to_html(&markup::render(t))));

	let on_input = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		store::save_document(backend.borrow_mut().as_mut(), &keys, &value);
		text.set(value);
	};

	view! {
		<div class="document-panel">
			<h2 class="document-title">"Documento formalizado"</h2>
			<div class="document-preview" inner_html=move || preview.get()></div>
			<textarea
				class="document-editor"
				prop:value=move || text.get()
				on:input=on_input
				spellcheck="false"
			></textarea>
		</div>
	}
}
