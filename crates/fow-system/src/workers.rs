//! Where the parallel fan-outs run.

use crate::VisionResult;

/// Either a dedicated Rayon pool or Rayon's global pool.  Without the
/// `parallel` feature everything runs on the calling thread.
#[derive(Debug, Default)]
pub(crate) struct Workers {
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl Workers {
    pub(crate) fn new(num_threads: Option<usize>) -> VisionResult<Self> {
        #[cfg(not(feature = "parallel"))]
        {
            if let Some(n) = num_threads {
                log::debug!("num_threads = {n} ignored: built without the `parallel` feature");
            }
            Ok(Self {})
        }

        #[cfg(feature = "parallel")]
        {
            let pool = match num_threads {
                None => None,
                Some(n) => Some(
                    rayon::ThreadPoolBuilder::new()
                        .num_threads(n)
                        .thread_name(|i| format!("fow-worker-{i}"))
                        .build()
                        .map_err(|e| crate::VisionError::Config(e.to_string()))?,
                ),
            };
            Ok(Self { pool })
        }
    }

    /// Run `op` so that Rayon calls inside it use this pool.
    pub(crate) fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        #[cfg(feature = "parallel")]
        {
            match &self.pool {
                Some(pool) => pool.install(op),
                None => op(),
            }
        }

        #[cfg(not(feature = "parallel"))]
        {
            op()
        }
    }

    pub(crate) fn thread_count(&self) -> usize {
        #[cfg(feature = "parallel")]
        {
            self.pool
                .as_ref()
                .map_or_else(rayon::current_num_threads, rayon::ThreadPool::current_num_threads)
        }

        #[cfg(not(feature = "parallel"))]
        {
            1
        }
    }
}
