//! Application orchestration: catalog, batch runs, aggregation, registry

use crate::{
    catalog::EndpointCatalog,
    client::{ProbeClientConfig, RpcProbeClient},
    config::display_config_summary,
    error::Result,
    executor::{BatchRunner, RunnerConfig},
    logging::{Logger, RunLogger},
    models::{Config, RunSummary},
    output::{JsonReporter, OutputFormatterFactory, ResultReporter},
    registry::ResultsRegistry,
    stats::Aggregator,
    types::{Category, CategorySelection},
};

/// Runs category benchmarks against one catalog and keeps their results
pub struct App {
    config: Config,
    catalog: EndpointCatalog,
    runner: BatchRunner<RpcProbeClient>,
    aggregator: Aggregator,
    registry: ResultsRegistry,
    run_logger: RunLogger,
}

impl App {
    /// Build an application reading the catalog named in `config`
    pub fn new(config: Config) -> Result<Self> {
        let catalog = EndpointCatalog::from_location(&config.catalog)?;
        Self::with_catalog(config, catalog)
    }

    /// Build an application over an explicit catalog
    pub fn with_catalog(config: Config, catalog: EndpointCatalog) -> Result<Self> {
        let logger = Logger::with_config("APP", &config);
        let prober = RpcProbeClient::new(
            ProbeClientConfig::default()
                .with_timeout(config.probe_timeout())
                .with_method(config.rpc_method.clone()),
        )?;
        let runner = BatchRunner::new(prober, RunnerConfig::from(&config)).with_logger(logger.child("RUNNER"));

        Ok(Self {
            aggregator: Aggregator::new(config.failure_policy),
            run_logger: RunLogger::new(logger),
            registry: ResultsRegistry::new(),
            catalog,
            runner,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ResultsRegistry {
        &self.registry
    }

    /// Benchmark one category: load, run all batches, aggregate, record.
    ///
    /// A catalog failure aborts before any batch runs. Probe failures
    /// never do.
    pub async fn run_category(&mut self, category: Category, reporter: &dyn ResultReporter) -> Result<RunSummary> {
        let logger = self.run_logger.logger();
        let correlation_id = logger.start_operation(&format!("{} run", category)).await;

        let endpoints = match self.catalog.load(category.tag()).await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                self.run_logger.log_error(&e, Some(&self.catalog.source().to_string())).await;
                logger
                    .end_operation(&correlation_id, &format!("{} run", category), false)
                    .await;
                return Err(e);
            }
        };

        logger
            .info(&format!("Loaded {} {} endpoints", endpoints.len(), category))
            .field("source", self.catalog.source().to_string())
            .log()
            .await;

        reporter.on_run_start(category, endpoints.len());
        let mut results = self.runner.run(category.tag(), &endpoints, reporter).await;
        let summary = self.aggregator.aggregate(&mut results);

        self.registry.record(&results, &summary);
        reporter.on_run_complete(&summary);

        if let Some(baseline) = category.baseline() {
            if let Some(overhead) = self.registry.category_overhead(baseline, category) {
                reporter.on_category_overhead(baseline, category, overhead);
            }
        }

        self.run_logger.log_run_summary(&summary).await;
        logger
            .end_operation(&correlation_id, &format!("{} run", category), true)
            .await;

        Ok(summary)
    }

    /// Run each selected category in order on the shared registry
    pub async fn run_selection(
        &mut self,
        selection: CategorySelection,
        reporter: &dyn ResultReporter,
    ) -> Result<Vec<RunSummary>> {
        let mut summaries = Vec::new();
        for category in selection.categories() {
            summaries.push(self.run_category(category, reporter).await?);
        }
        Ok(summaries)
    }

    /// Run the selection with the reporter the configuration asks for
    pub async fn run(&mut self, selection: CategorySelection) -> Result<()> {
        if self.config.debug {
            eprintln!("Configuration Summary:\n{}\n", display_config_summary(&self.config));
        }

        if self.config.json_output {
            let reporter = JsonReporter::new();
            self.run_selection(selection, &reporter).await?;
            println!("{}", reporter.render(&self.registry)?);
        } else {
            let reporter =
                OutputFormatterFactory::create_terminal_reporter(self.config.enable_color, self.config.verbose);
            self.run_selection(selection, &reporter).await?;
        }

        Ok(())
    }
}
