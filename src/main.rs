use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use clustermap::app::scene::{graph_scene, hierarchy_scene};
use clustermap::app::{GraphPanel, SummaryState};
use clustermap::service::payload::{ConceptResponse, GraphResponse, SessionRecord, SummaryResponse};
use clustermap::service::{ConceptService, DataService, SummaryRequest, SummaryService};
use clustermap::util::format_engagement;
use clustermap::{Command, Controller, Event, ServiceError, Topic};

/// Replays a scripted interaction against JSON fixtures and prints the
/// resulting scenes. Stands in for the rendering surface and the remote
/// services so the core can be exercised end to end from the shell.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph response fixture (Data Service shape).
    #[arg(long)]
    graph: PathBuf,
    /// Concept response fixture (Concept Service shape).
    #[arg(long)]
    concepts: Option<PathBuf>,
    /// Session record fixture; defaults to a single "local" top search.
    #[arg(long)]
    session: Option<PathBuf>,
    /// Edge similarity threshold applied after generation.
    #[arg(long)]
    threshold: Option<f32>,
    /// Cluster id to select after generation.
    #[arg(long)]
    select: Option<u32>,
}

struct FileServices {
    graph: PathBuf,
    concepts: Option<PathBuf>,
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ServiceError> {
    let raw = fs::read_to_string(path)
        .map_err(|error| ServiceError::Unavailable(format!("{}: {error}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|error| ServiceError::InvalidResponse(format!("{}: {error}", path.display())))
}

impl DataService for FileServices {
    fn fetch_graph(&mut self, _search_id: &str) -> Result<GraphResponse, ServiceError> {
        load_json(&self.graph)
    }
}

impl SummaryService for FileServices {
    fn summarize(&mut self, request: &SummaryRequest) -> Result<SummaryResponse, ServiceError> {
        // No summary backend in the demo host; synthesize a stable stub.
        Ok(SummaryResponse {
            title: format!("Cluster {}", request.cluster_id),
            summary: format!("{} stories in this cluster.", request.story_ids.len()),
            story_count: request.story_ids.len(),
        })
    }
}

impl ConceptService for FileServices {
    fn fetch_concepts(
        &mut self,
        _search_id: &str,
        cluster_id: u32,
    ) -> Result<ConceptResponse, ServiceError> {
        let Some(path) = &self.concepts else {
            return Err(ServiceError::Unavailable(format!(
                "no concept fixture supplied for cluster {cluster_id}"
            )));
        };
        load_json(path)
    }
}

/// Drains the command queue, posting each completion back into the
/// controller until it settles.
fn run_commands(controller: &mut Controller, services: &mut FileServices, commands: Vec<Command>) {
    let mut queue = VecDeque::from(commands);
    while let Some(command) = queue.pop_front() {
        let event = match command {
            Command::FetchGraph(token) => {
                let result = services.fetch_graph(&token.search_id);
                Event::GraphFetched { token, result }
            }
            Command::FetchSummary { token, request } => {
                let result = services.summarize(&request);
                Event::SummaryFetched { token, result }
            }
            Command::FetchConcepts(token) => {
                let result = services.fetch_concepts(&token.search_id, token.cluster_id);
                Event::ConceptFetched { token, result }
            }
            Command::OpenArticle { url } => {
                println!("open article: {url}");
                continue;
            }
        };
        queue.extend(controller.handle(event));
    }
}

fn dispatch(controller: &mut Controller, services: &mut FileServices, event: Event) {
    let commands = controller.handle(event);
    run_commands(controller, services, commands);
}

fn print_session(controller: &Controller) {
    let session = controller.session();
    let slot = session.active_slot();

    match &slot.graph {
        GraphPanel::NotGenerated => println!("graph: not generated"),
        GraphPanel::Loading => println!("graph: loading"),
        GraphPanel::NoData => println!("graph: no clusters for this search"),
        GraphPanel::Failed(message) => println!("graph error: {message}"),
        GraphPanel::Ready(_) => {}
    }

    if let Some(scene) = graph_scene(session) {
        println!(
            "{} clusters, {} edges at threshold {:.2}",
            scene.nodes.len(),
            scene.edges.len(),
            slot.threshold
        );
        for node in &scene.nodes {
            let marker = if node.selected { "*" } else { " " };
            println!(
                "{marker} [{:>3}] {:<40} pos ({:>7.2}, {:>7.2}) r {:.1} {}",
                node.id, node.label, node.pos.x, node.pos.y, node.radius, node.color
            );
        }
        for edge in &scene.edges {
            println!(
                "  {} -- {}  sim {:.2}  {:?} (w {:.1}, {})",
                edge.source,
                edge.target,
                edge.similarity,
                edge.style.tier,
                edge.style.width,
                edge.style.css_color()
            );
        }
    }

    if let Some(panel) = &slot.selection {
        println!(
            "selected cluster {}: {} ({} stories, avg engagement {})",
            panel.cluster_id,
            panel.label,
            panel.size,
            format_engagement(panel.avg_engagement)
        );
        match &panel.summary {
            SummaryState::Pending => println!("summary: generating..."),
            SummaryState::Ready(summary) => {
                println!("summary: {} - {}", summary.title, summary.body)
            }
            SummaryState::Failed(message) => println!("summary failed (retryable): {message}"),
        }
    }

    if let Some(scene) = hierarchy_scene(session) {
        println!(
            "concept hierarchy: {} nodes in {:.0}x{:.0}",
            scene.nodes.len(),
            scene.width,
            scene.height
        );
        for node in &scene.nodes {
            println!(
                "  L{} {:<32} ({:>6.1}, {:>6.1}) {:?}",
                node.layer, node.label, node.pos.x, node.pos.y, node.emphasis
            );
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let record = match &args.session {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read session record {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid session record {}", path.display()))?
        }
        None => SessionRecord {
            top_search_id: Some("local".to_owned()),
            bottom_search_id: None,
            clusters_generated: true,
        },
    };

    let mut services = FileServices {
        graph: args.graph,
        concepts: args.concepts,
    };

    let mut controller = Controller::new(record);
    dispatch(&mut controller, &mut services, Event::GenerateRequested { topic: Topic::Top });

    if let Some(threshold) = args.threshold {
        dispatch(&mut controller, &mut services, Event::ThresholdChanged(threshold));
    }
    if let Some(node_id) = args.select {
        dispatch(&mut controller, &mut services, Event::NodeClicked { node_id });
    }

    print_session(&controller);
    Ok(())
}
