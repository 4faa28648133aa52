use leptos::prelude::*;

use crate::components::concept_map::ConceptMapCanvas;
use crate::components::document::DocumentPanel;
use crate::config::CanvasConfig;

/// Document on the left, concept map on the right.
#[component]
pub fn Home() -> impl IntoView {
	let config = CanvasConfig::default();
	let keys = config.storage.clone();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="workspace">
				<DocumentPanel keys=keys />
				<div class="map-panel">
					<h2>"Mapa conceptual interactivo"</h2>
					<ConceptMapCanvas config=config />
				</div>
			</div>
		</ErrorBoundary>
	}
}
