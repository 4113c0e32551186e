extern crate chrono;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::arrivals;
use crate::config;
use crate::display;
use crate::drawing;
use crate::fetcher;
use crate::projection;
use crate::rotation;

/// Drives everything from one thread: poll if due, rotate if due, draw the
/// visible pair. Only the fetch can block, and only for the request timeout.
pub struct FrameLoop<S: display::DisplaySurface> {
    fetcher: fetcher::Fetcher,
    rotation: rotation::RotationScheduler,
    tables: config::DisplayTables,
    surface: S,
    frame_period: std::time::Duration,
}

impl<S: display::DisplaySurface> FrameLoop<S> {
    pub fn new(fetcher: fetcher::Fetcher,
               rotation: rotation::RotationScheduler,
               tables: config::DisplayTables,
               surface: S,
               frame_period: std::time::Duration) -> FrameLoop<S> {
        return FrameLoop {
            fetcher: fetcher,
            rotation: rotation,
            tables: tables,
            surface: surface,
            frame_period: frame_period,
        };
    }

    pub fn arrivals(&self) -> &[arrivals::Arrival] {
        return self.fetcher.arrivals();
    }

    pub fn last_success(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        return self.fetcher.last_success();
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        return &self.surface;
    }

    pub fn one_iteration(&mut self, now: chrono::DateTime<chrono::Utc>) -> projection::FrameProjection {
        if let fetcher::FetchOutcome::Updated(count) = self.fetcher.tick(now) {
            debug!("Rotating over {} arrivals", count);
        }

        let arrivals = self.fetcher.arrivals();
        self.rotation.tick(now, arrivals);

        let pair = self.rotation.current_pair(arrivals);
        let frame = projection::project_frame(&self.tables, &pair, arrivals.len());

        if let Err(err) = drawing::draw_frame(&mut self.surface, &frame) {
            warn!("Error presenting frame: {:?}", err);
        }

        return frame;
    }

    /// Ticks every `frame_period` until `shutdown` is set.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        info!("Frame loop running, one frame every {:?}", self.frame_period);

        while !shutdown.load(Ordering::SeqCst) {
            let started = std::time::Instant::now();
            self.one_iteration(chrono::Utc::now());

            let elapsed = started.elapsed();
            if elapsed < self.frame_period {
                std::thread::sleep(self.frame_period - elapsed);
            } else {
                debug!("Frame took {:?}, longer than the frame period", elapsed);
            }
        }

        info!("Stopping frame loop");
    }
}
