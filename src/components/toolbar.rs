//! Control panel next to the graph canvas: layouts, search, statistics and
//! JSON export/import.
//!
//! Buttons mutate the shared controller directly; the canvas picks up the
//! change through the surface's pending refresh.

use leptos::ev::{Event, MouseEvent};
use leptos::prelude::*;
use log::{info, warn};

use super::force_graph::{
	CircularLayout, ForceLayout, GraphStats, LayoutEngine, RandomLayout, SharedController,
};

fn stats_line(stats: &GraphStats) -> String {
	format!(
		"{} nodes · {} edges · density {:.3} · avg degree {:.2}",
		stats.node_count, stats.edge_count, stats.density, stats.average_degree
	)
}

/// Toolbar bound to the graph controller.
#[component]
pub fn Toolbar(controller: SharedController) -> impl IntoView {
	let stats = RwSignal::new(stats_line(&controller.borrow().stats()));
	let query = RwSignal::new(String::new());
	let hits = RwSignal::new(None::<usize>);
	let json = RwSignal::new(String::new());
	let status = RwSignal::new(None::<String>);
	let layout_seed = RwSignal::new(0u32);

	let refresh_stats = {
		let controller = controller.clone();
		move || stats.set(stats_line(&controller.borrow().stats()))
	};

	let run_layout = {
		let controller = controller.clone();
		move |layout: &dyn LayoutEngine| {
			controller.borrow_mut().apply_layout(layout);
		}
	};

	let on_circular = {
		let run_layout = run_layout.clone();
		move |_: MouseEvent| run_layout(&CircularLayout::default())
	};
	let on_random = {
		let run_layout = run_layout.clone();
		move |_: MouseEvent| {
			layout_seed.update(|s| *s += 1);
			run_layout(&RandomLayout {
				seed: layout_seed.get_untracked(),
			})
		}
	};
	let on_force = move |_: MouseEvent| run_layout(&ForceLayout::default());

	let on_clear = {
		let controller = controller.clone();
		move |_: MouseEvent| {
			controller.borrow_mut().clear_highlights();
			hits.set(None);
		}
	};

	let on_search = {
		let controller = controller.clone();
		move |ev: Event| {
			query.set(event_target_value(&ev));
			let q = query.get_untracked();
			let mut c = controller.borrow_mut();
			c.clear_highlights();
			if q.trim().is_empty() {
				hits.set(None);
				return;
			}
			let ids: Vec<String> = c.search_nodes(&q).iter().map(|m| m.id.to_string()).collect();
			let color = c.config().primary_color.clone();
			c.highlight_path(&ids, &color);
			hits.set(Some(ids.len()));
		}
	};

	let on_export = {
		let controller = controller.clone();
		move |_: MouseEvent| match controller.borrow().export_json() {
			Ok(text) => {
				json.set(text);
				status.set(Some("exported".into()));
			}
			Err(e) => {
				warn!("export failed: {e}");
				status.set(Some(format!("export failed: {e}")));
			}
		}
	};

	let on_import = {
		let controller = controller.clone();
		let refresh_stats = refresh_stats.clone();
		move |_: MouseEvent| {
			let result = controller.borrow_mut().import_json(&json.get_untracked());
			match result {
				Ok(()) => {
					refresh_stats();
					hits.set(None);
					status.set(Some("imported".into()));
				}
				Err(e) => status.set(Some(format!("import failed: {e}"))),
			}
		}
	};

	let on_stats = {
		let controller = controller.clone();
		move |_: MouseEvent| {
			let current = controller.borrow().stats();
			info!("graph statistics: {current:?}");
			refresh_stats();
		}
	};

	view! {
		<div class="graph-toolbar">
			<div class="toolbar-row">
				<button on:click=on_circular>"Circular"</button>
				<button on:click=on_random>"Random"</button>
				<button on:click=on_force>"Force"</button>
				<button on:click=on_clear>"Clear highlights"</button>
			</div>
			<div class="toolbar-row">
				<input
					type="search"
					placeholder="Search nodes"
					prop:value=move || query.get()
					on:input=on_search
				/>
				<span class="search-hits">
					{move || hits.get().map(|n| format!("{n} found")).unwrap_or_default()}
				</span>
			</div>
			<div class="toolbar-row">
				<button on:click=on_stats>"Stats"</button>
				<span class="graph-stats">{move || stats.get()}</span>
			</div>
			<div class="toolbar-row">
				<button on:click=on_export>"Export"</button>
				<button on:click=on_import>"Import"</button>
				<span class="io-status">{move || status.get().unwrap_or_default()}</span>
			</div>
			<textarea
				class="graph-json"
				rows="8"
				prop:value=move || json.get()
				on:input=move |ev: Event| json.set(event_target_value(&ev))
			/>
		</div>
	}
}
