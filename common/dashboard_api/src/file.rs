use crate::{
    ApiDataResponse, ChainId, DashboardId, Error, ErrorMessage, GroupId, SlotVizApi, SlotVizEpoch,
};
use async_trait::async_trait;
use std::path::PathBuf;

/// Serves the slot visualization from a JSON file holding a recorded API response.
///
/// The file is read on every request, so rewriting it changes what the next fetch returns. It may
/// hold either a `{"data": [...]}` response or a `{"code": .., "message": ..}` error message. The
/// dashboard and group ids of a request are ignored.
#[derive(Debug, Clone)]
pub struct FileSlotVizApi {
    path: PathBuf,
    chain_id: ChainId,
}

impl FileSlotVizApi {
    pub fn new(path: PathBuf, chain_id: ChainId) -> Self {
        Self { path, chain_id }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SlotVizApi for FileSlotVizApi {
    async fn get_slot_viz(
        &self,
        _dashboard_id: &DashboardId,
        _group_id: GroupId,
        _bypass_cache: bool,
    ) -> Result<Vec<SlotVizEpoch>, Error> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::Io(self.path.clone(), e))?;

        match serde_json::from_slice::<ApiDataResponse<Vec<SlotVizEpoch>>>(&bytes) {
            Ok(response) => Ok(response.data),
            Err(e) => match serde_json::from_slice::<ErrorMessage>(&bytes) {
                Ok(message) => Err(Error::ServerMessage(message)),
                Err(_) => Err(Error::InvalidJson(e)),
            },
        }
    }

    fn current_chain_id(&self) -> ChainId {
        self.chain_id
    }
}
