//! Object codec
//!
//! Encoding produces the self-describing stream `<kind> <length>\0<content>`; hashes
//! are taken over that uncompressed stream. Compression (zlib) is applied only for
//! storage, so an object's id does not depend on how it is stored.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{ObjectBox, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::errors::GotError;
use anyhow::Context;
use bytes::Bytes;
use std::io::{Cursor, Read, Write};

pub fn encode(object: &ObjectBox) -> anyhow::Result<Bytes> {
    object.serialize()
}

/// Decode an uncompressed object stream
///
/// Fails with `MalformedObject` when the kind is unknown, the declared length does
/// not match the payload, or the content breaks the kind's structure.
pub fn decode(data: &[u8]) -> anyhow::Result<ObjectBox> {
    decode_with_id(&ObjectId::from_encoded(data), data)
}

pub(crate) fn decode_with_id(oid: &ObjectId, data: &[u8]) -> anyhow::Result<ObjectBox> {
    let mut reader = Cursor::new(data);

    let (object_type, size) = ObjectType::parse_header(&mut reader)
        .map_err(|err| GotError::malformed(oid, format!("bad header: {err}")))?;

    let payload = &data[reader.position() as usize..];
    if payload.len() != size {
        return Err(GotError::malformed(
            oid,
            format!(
                "declared length {} does not match payload length {}",
                size,
                payload.len()
            ),
        )
        .into());
    }

    let reader = Cursor::new(payload);
    let object = match object_type {
        ObjectType::Blob => Blob::deserialize(reader).map(|blob| ObjectBox::Blob(Box::new(blob))),
        ObjectType::Tree => Tree::deserialize(reader).map(|tree| ObjectBox::Tree(Box::new(tree))),
        ObjectType::Commit => {
            Commit::deserialize(reader).map(|commit| ObjectBox::Commit(Box::new(commit)))
        }
        ObjectType::Tag => Tag::deserialize(reader).map(|tag| ObjectBox::Tag(Box::new(tag))),
    };

    Ok(object.map_err(|err| GotError::malformed(oid, format!("{err:#}")))?)
}

/// Read only the header of an uncompressed object stream
pub fn decode_type(oid: &ObjectId, data: &[u8]) -> anyhow::Result<ObjectType> {
    let (object_type, _) = ObjectType::parse_header(&mut Cursor::new(data))
        .map_err(|err| GotError::malformed(oid, format!("bad header: {err}")))?;

    Ok(object_type)
}

pub fn compress(data: &[u8]) -> anyhow::Result<Bytes> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(data)
        .context("Unable to compress object content")?;

    encoder
        .finish()
        .map(Bytes::from)
        .context("Unable to finish compressing object content")
}

pub fn decompress(data: &[u8]) -> anyhow::Result<Bytes> {
    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut decompressed_content = Vec::new();
    decoder
        .read_to_end(&mut decompressed_content)
        .context("Unable to decompress object content")?;

    Ok(decompressed_content.into())
}
