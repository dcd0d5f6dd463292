use std::time::{Duration, Instant};

use log::info;
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    step::{Step, StepExecution},
};

/// Type alias for job execution results.
///
/// A `JobResult` is a `Result` that contains either:
/// - A successful `JobExecution` with execution details
/// - A `BatchError` indicating what went wrong
type JobResult<T> = Result<T, BatchError>;

/// Represents a job that can be executed.
///
/// A job is a container for a sequence of steps that are executed in order.
/// The job is responsible for orchestrating the steps and reporting the
/// overall result.
pub trait Job {
    /// Runs the job and returns the result of the job execution.
    ///
    /// # Returns
    /// - `Ok(JobExecution)` when every step ran to completion
    /// - `Err(BatchError)` when a step hit a fatal error
    fn run(&self) -> JobResult<JobExecution>;
}

/// Represents the execution of a job.
///
/// Besides timing, it keeps the execution of every step so that callers can
/// report counters once the job is over.
#[derive(Debug)]
pub struct JobExecution {
    /// The time when the job started executing
    pub start: Instant,
    /// The time when the job finished executing
    pub end: Instant,
    /// The total duration of the job execution
    pub duration: Duration,
    /// One execution per step, in the order the steps ran
    pub step_executions: Vec<StepExecution>,
}

/// Represents an instance of a job.
///
/// A job instance is created through the `JobBuilder` and executed by calling
/// the `run` method. The steps are executed in the order they were added.
pub struct JobInstance<'a> {
    /// Unique identifier for this job instance
    id: Uuid,
    /// Human-readable name for the job
    name: String,
    /// Collection of steps that make up this job, in execution order
    steps: Vec<&'a dyn Step>,
}

impl JobInstance<'_> {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Job for JobInstance<'_> {
    /// Runs the job by executing its steps in sequence.
    ///
    /// If any step fails, the remaining steps are not executed and an error
    /// naming the failed step is returned.
    fn run(&self) -> JobResult<JobExecution> {
        let start = Instant::now();

        info!("Start of job: {}, id: {}", self.name, self.id);

        let mut step_executions = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let mut step_execution = StepExecution::new(step.get_name());

            if step.execute(&mut step_execution).is_err() {
                return Err(BatchError::Step(step.get_name().to_owned()));
            }

            step_executions.push(step_execution);
        }

        info!("End of job: {}, id: {}", self.name, self.id);

        Ok(JobExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            step_executions,
        })
    }
}

/// Builder for creating a job instance.
///
/// # Example
///
/// ```rust,ignore
/// use fightstats_loader::core::job::JobBuilder;
///
/// let job = JobBuilder::new()
///     .name("upload-fighter-data".to_string())
///     .start(&upload_step)
///     .build();
/// ```
#[derive(Default)]
pub struct JobBuilder<'a> {
    /// Optional name for the job (generated randomly if not specified)
    name: Option<String>,
    /// Collection of steps to be executed, in order
    steps: Vec<&'a dyn Step>,
}

impl<'a> JobBuilder<'a> {
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
        }
    }

    /// Sets the name of the job.
    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Sets the first step of the job.
    ///
    /// This method is semantically identical to `next()` but provides better readability
    /// when constructing the initial step of a job.
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Adds a step to the job. Steps are executed in the order they are added.
    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Builds the job. If no name has been provided, a random name is generated.
    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::{
        core::step::{Step, StepExecution},
        BatchError,
    };

    use super::{Job, JobBuilder};

    struct CountingStep {
        name: &'static str,
        fail: bool,
        runs: RefCell<Vec<&'static str>>,
    }

    impl CountingStep {
        fn new(name: &'static str, fail: bool) -> Self {
            Self {
                name,
                fail,
                runs: RefCell::new(Vec::new()),
            }
        }
    }

    impl Step for CountingStep {
        fn get_name(&self) -> &str {
            self.name
        }

        fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
            self.runs.borrow_mut().push(self.name);
            step_execution.write_count = 7;
            if self.fail {
                Err(BatchError::ItemReader("missing file".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn runs_steps_in_order_and_keeps_their_executions() {
        let first = CountingStep::new("first", false);
        let second = CountingStep::new("second", false);

        let job = JobBuilder::new()
            .name("test".to_string())
            .start(&first)
            .next(&second)
            .build();
        let execution = job.run().expect("job should succeed");

        assert_eq!(job.get_name(), "test");
        assert_eq!(execution.step_executions.len(), 2);
        assert_eq!(execution.step_executions[0].name, "first");
        assert_eq!(execution.step_executions[1].name, "second");
        assert_eq!(execution.step_executions[1].write_count, 7);
    }

    #[test]
    fn failing_step_aborts_the_job() {
        let failing = CountingStep::new("failing", true);
        let never = CountingStep::new("never", false);

        let job = JobBuilder::new().start(&failing).next(&never).build();
        let result = job.run();

        assert!(matches!(result, Err(BatchError::Step(name)) if name == "failing"));
        assert!(never.runs.borrow().is_empty());
    }

    #[test]
    fn unnamed_job_gets_a_random_name() {
        let job = JobBuilder::new().build();
        assert_eq!(job.get_name().len(), 8);
    }
}
