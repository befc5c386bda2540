use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use algo_visualiser_core::tree::Balance;
use algo_visualiser_core::{
    binary_search, linear_search, sort, traversal_trace, traverse, AlgoVizError, AnimationEvent,
    AppConfig, AvlTree, BinaryHeap, BinarySearchTree, HeapKind, PlaybackClock, Player, Result,
    SearchAlgorithm, SearchTree, SortAlgorithm, TraversalOrder, Value,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const DEFAULT_ARRAY: [Value; 10] = [28, 77, 21, 42, 89, 33, 17, 65, 91, 53];

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    tracing::debug!(?config, "configuration ready");

    match cli.command {
        Commands::Bst(args) => {
            let report = Report::new(cli.json, &args.trace, &config);
            run_tree::<BinarySearchTree>("BST", args, &config, &report)
        }
        Commands::Avl(args) => {
            let report = Report::new(cli.json, &args.trace, &config);
            run_tree::<AvlTree>("AVL", args, &config, &report)
        }
        Commands::Heap(args) => {
            let report = Report::new(cli.json, &args.trace, &config);
            run_heap(args, &config, &report)
        }
        Commands::Sort(args) => {
            let report = Report::new(cli.json, &args.trace, &config);
            run_sort(args, &report)
        }
        Commands::Search(args) => {
            let report = Report::new(cli.json, &args.trace, &config);
            run_search(args, &report)
        }
        Commands::Traverse(args) => {
            let report = Report::new(cli.json, &args.trace, &config);
            run_traverse(args, &config, &report)
        }
    }
}

fn run_tree<T>(label: &str, args: TreeArgs, config: &AppConfig, report: &Report) -> Result<()>
where
    T: TreeEngine,
{
    args.check()?;
    let mut tree = if args.random {
        T::random(config)?
    } else {
        T::seeded(&args.seed_values)
    };
    tracing::info!(tree = label, op = ?args.op, size = tree.size(), "running tree operations");

    for value in &args.values {
        let events = match args.op {
            TreeOp::Insert => tree.insert_traced(*value, report.animate),
            TreeOp::Delete => tree.delete_traced(*value, report.animate),
            TreeOp::Search => tree.search_traced(*value, report.animate),
        };
        report.trace(&events)?;
    }

    report.summary(
        json!({
            "tree": label,
            "inOrder": tree.values(),
            "stats": tree.stats_json(),
        }),
        format!("{label} in-order: {:?}", tree.values()),
    )
}

fn run_heap(args: HeapArgs, config: &AppConfig, report: &Report) -> Result<()> {
    args.check()?;
    let kind = if args.max { HeapKind::Max } else { config.heap.kind };

    let heap = match args.op {
        HeapOp::Heapify => {
            let traced = BinaryHeap::heapify(&args.values, kind, report.animate);
            report.trace(&traced.events)?;
            traced.output
        }
        HeapOp::Insert | HeapOp::Extract => {
            let mut heap = if args.random {
                BinaryHeap::create_random(
                    config.random.count,
                    config.random.min,
                    config.random.max,
                    kind,
                )?
            } else {
                BinaryHeap::heapify(&args.seed_values, kind, false).output
            };
            if args.op == HeapOp::Insert {
                for value in &args.values {
                    report.trace(&heap.insert(*value, report.animate).events)?;
                }
            } else {
                for _ in 0..args.times {
                    let traced = heap.extract_root(report.animate);
                    report.trace(&traced.events)?;
                    report.line(match traced.output {
                        Some(value) => format!("extracted {value}"),
                        None => "heap is empty".to_string(),
                    });
                }
            }
            heap
        }
    };

    tracing::info!(kind = %kind, size = heap.len(), valid = heap.is_valid(), "heap ready");
    let peek = heap.peek();
    report.summary(
        json!({ "kind": kind, "array": heap.to_array(), "root": peek }),
        format!("{kind} heap: {:?}", heap.to_array()),
    )
}

fn run_sort(args: SortArgs, report: &Report) -> Result<()> {
    let values = values_or_default(args.values);
    let traced = sort(&values, args.algorithm, report.animate);
    report.trace(&traced.events)?;

    let properties = args.algorithm.properties();
    report.summary(
        json!({
            "algorithm": args.algorithm,
            "sorted": traced.output.values,
            "origin": traced.output.origin,
            "properties": properties,
        }),
        format!(
            "{}: {:?} (stable: {}, average {})",
            args.algorithm.display_name(),
            traced.output.values,
            properties.stable,
            properties.average
        ),
    )
}

fn run_search(args: SearchArgs, report: &Report) -> Result<()> {
    let values = values_or_default(args.values);
    let (index, searched) = match args.algorithm {
        SearchAlgorithm::Linear => {
            let traced = linear_search(&values, args.target, report.animate);
            report.trace(&traced.events)?;
            (traced.output, values)
        }
        SearchAlgorithm::Binary => {
            let traced = binary_search(&values, args.target, report.animate);
            report.trace(&traced.events)?;
            (traced.output.index, traced.output.searched)
        }
    };

    report.summary(
        json!({ "target": args.target, "index": index, "array": searched }),
        match index {
            Some(index) => format!("{} found at index {index} of {searched:?}", args.target),
            None => format!("{} not found in {searched:?}", args.target),
        },
    )
}

fn run_traverse(args: TraverseArgs, config: &AppConfig, report: &Report) -> Result<()> {
    let tree = if args.random {
        BinarySearchTree::create_random(config.random.count, config.random.min, config.random.max)?
    } else {
        BinarySearchTree::from_values(args.values.iter().copied())
    };
    let order = TraversalOrder::from(args.order);

    if report.animate {
        report.trace(&traversal_trace(tree.root(), order))?;
    }
    let visited = traverse(tree.root(), order);
    report.summary(
        json!({ "order": order, "visited": visited }),
        format!("{} traversal: {visited:?}", order.as_str()),
    )
}

fn values_or_default(values: Vec<Value>) -> Vec<Value> {
    if values.is_empty() {
        DEFAULT_ARRAY.to_vec()
    } else {
        values
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Prints traces and results, either as text or as one JSON document per line.
struct Report {
    json: bool,
    animate: bool,
    replay: Option<Duration>,
}

impl Report {
    fn new(json: bool, trace: &TraceArgs, config: &AppConfig) -> Self {
        Self {
            json,
            animate: trace.animate || trace.replay,
            replay: trace.replay.then(|| config.playback.step_delay()),
        }
    }

    fn trace(&self, events: &[AnimationEvent]) -> Result<()> {
        let Some(delay) = self.replay else {
            for (step, event) in events.iter().enumerate() {
                self.event(step, event)?;
            }
            return Ok(());
        };

        let mut player = Player::new(events.to_vec(), delay);
        let mut clock = PlaybackClock::default();
        loop {
            let start = player.position();
            for (offset, event) in player.tick(&clock).iter().enumerate() {
                self.event(start + offset, event)?;
            }
            if player.is_finished() {
                return Ok(());
            }
            thread::sleep(delay);
            clock.advance(delay);
        }
    }

    fn event(&self, step: usize, event: &AnimationEvent) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{step:>4}  {:<18} {}", event.type_name(), event.message);
        }
        Ok(())
    }

    fn line(&self, text: String) {
        if !self.json {
            println!("{text}");
        }
    }

    fn summary(&self, document: serde_json::Value, text: String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(&json!({ "result": document }))?);
        } else {
            println!("{text}");
        }
        Ok(())
    }
}

/// The operations the CLI needs from either tree engine, with traces flattened to events.
trait TreeEngine: Sized {
    fn seeded(values: &[Value]) -> Self;
    fn random(config: &AppConfig) -> Result<Self>;
    fn size(&self) -> usize;
    fn insert_traced(&mut self, value: Value, animate: bool) -> Vec<AnimationEvent>;
    fn delete_traced(&mut self, value: Value, animate: bool) -> Vec<AnimationEvent>;
    fn search_traced(&self, value: Value, animate: bool) -> Vec<AnimationEvent>;
    fn values(&self) -> Vec<Value>;
    fn stats_json(&self) -> serde_json::Value;
}

impl<B: Balance> TreeEngine for SearchTree<B> {
    fn seeded(values: &[Value]) -> Self {
        Self::from_values(values.iter().copied())
    }

    fn random(config: &AppConfig) -> Result<Self> {
        Self::create_random(config.random.count, config.random.min, config.random.max)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn insert_traced(&mut self, value: Value, animate: bool) -> Vec<AnimationEvent> {
        self.insert(value, animate).events
    }

    fn delete_traced(&mut self, value: Value, animate: bool) -> Vec<AnimationEvent> {
        self.delete(value, animate).events
    }

    fn search_traced(&self, value: Value, animate: bool) -> Vec<AnimationEvent> {
        self.search(value, animate).events
    }

    fn values(&self) -> Vec<Value> {
        self.to_array()
    }

    fn stats_json(&self) -> serde_json::Value {
        json!(self.stats())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Step-by-step data structure and algorithm visualiser", long_about = None)]
struct Cli {
    /// JSON configuration file; built-in defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print every event and result as a JSON line.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run operations on an unbalanced binary search tree.
    Bst(TreeArgs),
    /// Run operations on a self-balancing AVL tree.
    Avl(TreeArgs),
    /// Run operations on a binary heap.
    Heap(HeapArgs),
    /// Sort an array and show every comparison and move.
    Sort(SortArgs),
    /// Search an array for a target value.
    Search(SearchArgs),
    /// Walk a binary search tree built from the given values.
    Traverse(TraverseArgs),
}

#[derive(Args, Debug)]
struct TraceArgs {
    /// Print the recorded trace of each operation.
    #[arg(long)]
    animate: bool,
    /// Replay the trace with the configured delay between steps.
    #[arg(long)]
    replay: bool,
}

#[derive(Args, Debug)]
struct TreeArgs {
    #[arg(value_enum)]
    op: TreeOp,
    /// Values to apply the operation to, in order.
    #[arg(allow_negative_numbers = true)]
    values: Vec<Value>,
    /// Comma-separated values inserted silently before the operations run.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    seed_values: Vec<Value>,
    /// Start from a random tree drawn with the configured parameters.
    #[arg(long, conflicts_with = "seed_values")]
    random: bool,
    #[command(flatten)]
    trace: TraceArgs,
}

impl TreeArgs {
    fn check(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(format!("{:?} needs at least one value", self.op).into());
        }
        Ok(())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TreeOp {
    Insert,
    Delete,
    Search,
}

#[derive(Args, Debug)]
struct HeapArgs {
    #[arg(value_enum)]
    op: HeapOp,
    /// Values to insert, or the array to heapify.
    #[arg(allow_negative_numbers = true)]
    values: Vec<Value>,
    /// Build a max heap instead of the configured kind.
    #[arg(long)]
    max: bool,
    /// Number of roots to remove with `extract`.
    #[arg(long, default_value_t = 1)]
    times: usize,
    /// Comma-separated values the heap starts with for `insert` and `extract`.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    seed_values: Vec<Value>,
    /// Start from a random heap drawn with the configured parameters.
    #[arg(long, conflicts_with = "seed_values")]
    random: bool,
    #[command(flatten)]
    trace: TraceArgs,
}

impl HeapArgs {
    fn check(&self) -> Result<()> {
        match self.op {
            HeapOp::Extract if self.times == 0 => {
                Err(AlgoVizError::msg("--times must be at least 1"))
            }
            HeapOp::Insert | HeapOp::Heapify if self.values.is_empty() => {
                Err("no values given to the heap".into())
            }
            _ => Ok(()),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum HeapOp {
    Insert,
    Extract,
    Heapify,
}

#[derive(Args, Debug)]
struct SortArgs {
    /// bubble, insertion, selection, merge or quick.
    #[arg(long, default_value = "merge")]
    algorithm: SortAlgorithm,
    /// Array to sort; a fixed ten-element sample when omitted.
    #[arg(allow_negative_numbers = true)]
    values: Vec<Value>,
    #[command(flatten)]
    trace: TraceArgs,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// linear or binary.
    #[arg(long, default_value = "linear")]
    algorithm: SearchAlgorithm,
    #[arg(long, allow_negative_numbers = true)]
    target: Value,
    /// Array to search; a fixed ten-element sample when omitted.
    #[arg(allow_negative_numbers = true)]
    values: Vec<Value>,
    #[command(flatten)]
    trace: TraceArgs,
}

#[derive(Args, Debug)]
struct TraverseArgs {
    #[arg(long, value_enum, default_value_t = Order::In)]
    order: Order,
    /// Values inserted into the tree in order.
    #[arg(allow_negative_numbers = true)]
    values: Vec<Value>,
    /// Use a random tree drawn with the configured parameters.
    #[arg(long)]
    random: bool,
    #[command(flatten)]
    trace: TraceArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Order {
    In,
    Pre,
    Post,
    Level,
}

impl From<Order> for TraversalOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::In => TraversalOrder::InOrder,
            Order::Pre => TraversalOrder::PreOrder,
            Order::Post => TraversalOrder::PostOrder,
            Order::Level => TraversalOrder::LevelOrder,
        }
    }
}
