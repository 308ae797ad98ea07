use leptos::prelude::*;

use crate::components::graph_editor::GraphEditorCanvas;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
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

			<div class="fullscreen-graph">
				<GraphEditorCanvas fullscreen=true />
				<div class="graph-overlay">
					<h1>"Graph Designer"</h1>
					<p class="subtitle">
						"Double-click to add a vertex. Drag to move it. Hold Shift and drag between vertices to connect them."
					</p>
					<p class="subtitle">
						"Type a letter to label the selected vertex, digits to weight the selected edge, Delete to remove."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
