use super::{BuildContext, BuilderCore, FrameBuilder, check_width};
use crate::frame::error::FrameError;
use crate::frame::types::{FrameType, Priority, PriorityFrame, StreamId};

/// Builder for PRIORITY frames. The dependency and weight are required.
#[derive(Debug)]
pub struct PriorityBuilder {
    core: BuilderCore,
    exclusive: bool,
    dependency: Option<u32>,
    weight: Option<u8>,
}

impl PriorityBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            core: BuilderCore::new(FrameType::Priority, ctx),
            exclusive: false,
            dependency: None,
            weight: None,
        }
    }

    pub fn set_exclusive(&mut self, exclusive: bool) -> Result<&mut Self, FrameError> {
        self.exclusive = exclusive;
        Ok(self)
    }

    pub fn set_dependency_stream(&mut self, stream_id: u32) -> Result<&mut Self, FrameError> {
        if self.core.validate() {
            check_width("dependency stream ID", stream_id as u64, 31)?;
        }
        self.dependency = Some(stream_id);
        Ok(self)
    }

    pub fn set_weight(&mut self, weight: u8) -> Result<&mut Self, FrameError> {
        self.weight = Some(weight);
        Ok(self)
    }
}

impl FrameBuilder for PriorityBuilder {
    type Frame = PriorityFrame;

    fn core(&mut self) -> &mut BuilderCore {
        &mut self.core
    }

    fn build(self) -> Result<PriorityFrame, FrameError> {
        let validate = self.core.validate();
        let dependency = match self.dependency {
            Some(dependency) => dependency,
            None if validate => return Err(self.core.missing("dependency stream")),
            None => 0,
        };
        let weight = match self.weight {
            Some(weight) => weight,
            None if validate => return Err(self.core.missing("weight")),
            None => Priority::DEFAULT_WEIGHT,
        };

        let stream_id = self.core.stream_id();
        if validate && dependency == stream_id && stream_id != 0 {
            return Err(FrameError::SelfDependency { stream_id });
        }

        let header = self.core.finish(5)?;
        Ok(PriorityFrame {
            header,
            priority: Priority {
                exclusive: self.exclusive,
                dependency: StreamId::new(dependency),
                weight,
            },
        })
    }
}
